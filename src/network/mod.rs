pub mod client;
pub mod error;
pub mod peers;

pub use client::{BroadcastReport, PeerClient, PeerFailure};
pub use error::{PeerError, PeerResult};
pub use peers::PeerRegistry;

/// Route prefix shared by every node.
pub const API_PREFIX: &str = "/api/v1";

pub const BLOCKCHAIN_PATH: &str = "/api/v1/blockchain/";
pub const RECEIVE_NEW_BLOCK_PATH: &str = "/api/v1/receive-new-block/";
pub const REGISTER_NODE_PATH: &str = "/api/v1/register-node/";
pub const REGISTER_NODE_BULK_PATH: &str = "/api/v1/register-node-bulk/";
pub const TRANSACTION_PATH: &str = "/api/v1/transaction/";
