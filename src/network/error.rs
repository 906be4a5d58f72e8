use thiserror::Error;

pub type PeerResult<T> = Result<T, PeerError>;

#[derive(Debug, Error)]
pub enum PeerError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}
