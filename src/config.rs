use std::env;
use std::time::Duration;

use uuid::Uuid;

/// Node settings read from the environment (a `.env` file is honored).
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    /// Address other nodes use to reach this one.
    pub node_url: String,
    /// Account credited with mining rewards.
    pub node_address: String,
    pub peer_timeout: Duration,
}

impl NodeConfig {
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080);
        let node_url = env::var("NODE_URL").unwrap_or_else(|_| format!("http://{host}:{port}"));
        let node_address = env::var("NODE_ADDRESS")
            .unwrap_or_else(|_| Uuid::new_v4().simple().to_string());
        let peer_timeout = env::var("PEER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(10));

        Self {
            host,
            port,
            node_url,
            node_address,
            peer_timeout,
        }
    }
}
