use crate::blockchain::{Block, Ledger};
use crate::config::NodeConfig;
use crate::network::{BroadcastReport, PeerClient, PeerFailure, PeerResult};
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// Shared application state: this node's ledger plus what it needs to
/// mine and talk to peers.
pub struct AppState {
    pub ledger: Mutex<Ledger>,
    pub node_address: String,
    pub peers: PeerClient,
    pub mining: MiningState,
}

impl AppState {
    pub fn new(config: &NodeConfig) -> PeerResult<Self> {
        Ok(Self {
            ledger: Mutex::new(Ledger::new(config.node_url.clone())),
            node_address: config.node_address.clone(),
            peers: PeerClient::new(config.peer_timeout)?,
            mining: MiningState::default(),
        })
    }
}

/// Cancel flags of the searches still running. Each search gets its own
/// flag; raising happens when the chain tip moves.
#[derive(Default)]
pub struct MiningState {
    live: Mutex<Vec<Weak<AtomicBool>>>,
}

impl MiningState {
    /// Raise the flag of every search still holding one.
    pub fn cancel(&self) {
        let mut live = self.live.lock().expect("mutex poisoned");
        for flag in live.drain(..).filter_map(|w| w.upgrade()) {
            flag.store(true, Ordering::Relaxed);
        }
    }

    /// Hand a fresh flag to a new search. Earlier flags are left alone.
    pub fn start(&self) -> Arc<AtomicBool> {
        let flag = Arc::new(AtomicBool::new(false));
        let mut live = self.live.lock().expect("mutex poisoned");
        live.retain(|w| w.strong_count() > 0);
        live.push(Arc::downgrade(&flag));
        flag
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub status: &'static str,
    pub block: Block,
    pub block_broadcast: BroadcastReport,
    pub reward_broadcast: BroadcastReport,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct ReceiveBlockResponse {
    pub status: &'static str,
    pub accepted: bool,
}

#[derive(Serialize)]
pub struct ConsensusResponse {
    pub status: &'static str,
    pub replaced: bool,
    pub length: usize,
    pub unreachable: Vec<PeerFailure>,
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterNodeRequest {
    pub new_node_url: String,
}

#[derive(Deserialize)]
pub struct RegisterNodeBulkRequest {
    pub new_node_urls: Vec<String>,
}

#[derive(Serialize)]
pub struct RegisterNodeResponse {
    pub status: &'static str,
    pub added: usize,
}

#[derive(Serialize)]
pub struct RegisterAndBroadcastResponse {
    pub status: &'static str,
    pub broadcast: BroadcastReport,
    /// Error from handing our peer list to the new node, if any.
    pub bulk_registration_error: Option<String>,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub status: &'static str,
    pub block_index: u64,
}

#[derive(Serialize)]
pub struct BroadcastTxResponse {
    pub status: &'static str,
    pub transaction: Transaction,
    pub block_index: u64,
    pub broadcast: BroadcastReport,
}

#[derive(Serialize)]
pub struct MempoolResponse {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::{GENESIS_HASH, MiningJob, hash_block, hash_is_valid};
    use std::thread;

    #[test]
    fn cancel_reaches_every_running_search() {
        let mining = MiningState::default();
        let a = mining.start();
        let b = mining.start();
        mining.cancel();
        assert!(a.load(Ordering::Relaxed));
        assert!(b.load(Ordering::Relaxed));
    }

    #[test]
    fn new_search_does_not_revive_cancelled_one() {
        let mining = MiningState::default();
        let a = mining.start();
        mining.cancel();
        let b = mining.start();
        assert!(a.load(Ordering::Relaxed));
        assert!(!b.load(Ordering::Relaxed));
    }

    #[test]
    fn search_started_after_cancel_is_unaffected() {
        let mining = MiningState::default();
        mining.cancel();
        let a = mining.start();
        assert!(!a.load(Ordering::Relaxed));
    }

    /// A job whose first solution lies far past the first few flag polls.
    fn slow_job() -> MiningJob {
        (1..)
            .map(|index| MiningJob {
                index,
                previous_block_hash: GENESIS_HASH.to_string(),
                transactions: Vec::new(),
            })
            .find(|job| {
                (0..32 * 1024).all(|n| {
                    !hash_is_valid(&hash_block(
                        job.index,
                        &job.previous_block_hash,
                        &job.transactions,
                        n,
                    ))
                })
            })
            .expect("some index needs more than 32k attempts")
    }

    #[test]
    fn running_search_stops_when_cancelled() {
        let mining = MiningState::default();
        let job = slow_job();
        let flag = mining.start();
        let search = thread::spawn(move || job.solve(&flag));
        mining.cancel();
        assert_eq!(search.join().expect("search thread"), None);
    }
}
