use std::sync::atomic::{AtomicBool, Ordering};

use super::block::{Block, hash_block, hash_is_valid};
use super::CANCEL_CHECK_INTERVAL;
use crate::transaction::Transaction;

/// Search nonce = 0, 1, 2, ... and return the first one whose digest
/// meets the difficulty target. Unbounded; blocks the caller until solved.
pub fn proof_of_work(index: u64, previous_block_hash: &str, transactions: &[Transaction]) -> u64 {
    let mut nonce: u64 = 0;
    loop {
        let hash = hash_block(index, previous_block_hash, transactions, nonce);
        if hash_is_valid(&hash) {
            return nonce;
        }
        nonce = nonce.wrapping_add(1);
    }
}

/// Same search as [`proof_of_work`], but gives up with `None` once `cancel`
/// is raised. The flag is polled every `CANCEL_CHECK_INTERVAL` attempts.
pub fn proof_of_work_until(
    index: u64,
    previous_block_hash: &str,
    transactions: &[Transaction],
    cancel: &AtomicBool,
) -> Option<u64> {
    let mut nonce: u64 = 0;
    loop {
        if nonce % CANCEL_CHECK_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
            log::debug!("mining block #{index} cancelled at nonce {nonce}");
            return None;
        }
        let hash = hash_block(index, previous_block_hash, transactions, nonce);
        if hash_is_valid(&hash) {
            return Some(nonce);
        }
        nonce = nonce.wrapping_add(1);
    }
}

/// Work captured at mining start: the next index, the tip it extends and
/// the exact pending transactions it will seal.
#[derive(Debug, Clone)]
pub struct MiningJob {
    pub index: u64,
    pub previous_block_hash: String,
    pub transactions: Vec<Transaction>,
}

impl MiningJob {
    pub fn solve(&self, cancel: &AtomicBool) -> Option<u64> {
        proof_of_work_until(
            self.index,
            &self.previous_block_hash,
            &self.transactions,
            cancel,
        )
    }

    /// Seal the job into a block with the found nonce, stamped now.
    pub fn into_block(self, nonce: u64) -> Block {
        let hash = hash_block(
            self.index,
            &self.previous_block_hash,
            &self.transactions,
            nonce,
        );
        Block::new(
            self.index,
            self.transactions,
            nonce,
            hash,
            self.previous_block_hash,
            None,
        )
    }
}
