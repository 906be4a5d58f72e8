pub mod block;
pub mod consensus;
pub mod model;
pub mod pow;
pub mod validation;

pub use block::{Block, hash_block, hash_is_valid};
pub use consensus::longest_candidate;
pub use model::{Ledger, LedgerSnapshot};
pub use pow::{MiningJob, proof_of_work, proof_of_work_until};
pub use validation::{block_can_be_appended, chain_is_valid};

/// Required hex prefix of a valid block digest (fixed difficulty).
pub const DIFFICULTY_PREFIX: &str = "0000";

/// Hash and previous-hash of the genesis block.
pub const GENESIS_HASH: &str = "0";

/// Genesis timestamp, shared by every node so genesis blocks compare equal.
pub const GENESIS_TIMESTAMP: i64 = 0;

/// Reward paid to the miner of each block.
pub const MINING_REWARD: f64 = 12.5;

/// How many nonces a cancellable search tries between flag checks.
pub const CANCEL_CHECK_INTERVAL: u64 = 1024;
