pub mod model;
pub mod pool;

pub use model::{NETWORK_SENDER, Transaction};
pub use pool::TransactionPool;
