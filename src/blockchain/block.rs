use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{DIFFICULTY_PREFIX, GENESIS_HASH, GENESIS_TIMESTAMP};
use crate::transaction::Transaction;

/// A single block in the ledger holding a batch of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub nonce: u64,   // Proof-of-Work nonce
    pub hash: String, // Declared hash, never re-checked by the validator
    pub previous_block_hash: String,
    pub timestamp: i64, // Unix epoch millis
}

/// Fields that go into the digest, in hashing order.
#[derive(Serialize)]
struct BlockPreimage<'a> {
    index: u64,
    previous_block_hash: &'a str,
    transactions: &'a [Transaction],
    nonce: u64,
}

impl Block {
    /// The fixed first block every valid chain must start with.
    pub fn genesis() -> Self {
        Self {
            index: 0,
            transactions: Vec::new(),
            nonce: 0,
            hash: GENESIS_HASH.to_string(),
            previous_block_hash: GENESIS_HASH.to_string(),
            timestamp: GENESIS_TIMESTAMP,
        }
    }

    /// Assemble a block; `timestamp` defaults to now.
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        nonce: u64,
        hash: String,
        previous_block_hash: String,
        timestamp: Option<i64>,
    ) -> Self {
        Self {
            index,
            transactions,
            nonce,
            hash,
            previous_block_hash,
            timestamp: timestamp.unwrap_or_else(|| Utc::now().timestamp_millis()),
        }
    }

    /// Digest recomputed from this block's own fields.
    pub fn compute_hash(&self) -> String {
        hash_block(
            self.index,
            &self.previous_block_hash,
            &self.transactions,
            self.nonce,
        )
    }
}

/// SHA-256 (hex) over the compact JSON of index, previous hash,
/// transactions and nonce. Transaction order is part of the input.
pub fn hash_block(
    index: u64,
    previous_block_hash: &str,
    transactions: &[Transaction],
    nonce: u64,
) -> String {
    let preimage = BlockPreimage {
        index,
        previous_block_hash,
        transactions,
        nonce,
    };
    let bytes = serde_json::to_vec(&preimage).expect("serialize block preimage");
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    hex::encode(hasher.finalize())
}

/// True iff the digest meets the fixed difficulty target.
pub fn hash_is_valid(hash: &str) -> bool {
    hash.starts_with(DIFFICULTY_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str, amount: f64) -> Transaction {
        Transaction {
            sender: "alice".into(),
            recipient: "bob".into(),
            amount,
            id: id.into(),
        }
    }

    #[test]
    fn genesis_is_fixed() {
        let g = Block::genesis();
        assert_eq!(g.index, 0);
        assert_eq!(g.nonce, 0);
        assert_eq!(g.hash, "0");
        assert_eq!(g.previous_block_hash, "0");
        assert!(g.transactions.is_empty());
        assert_eq!(g, Block::genesis());
    }

    #[test]
    fn hash_is_deterministic() {
        let txs = vec![tx("a1", 1.0), tx("b2", 2.0)];
        let h1 = hash_block(3, "abc", &txs, 42);
        let h2 = hash_block(3, "abc", &txs, 42);
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert!(h1.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn transaction_order_changes_hash() {
        let forward = vec![tx("a1", 1.0), tx("b2", 2.0)];
        let reversed = vec![tx("b2", 2.0), tx("a1", 1.0)];
        assert_ne!(
            hash_block(1, "0", &forward, 0),
            hash_block(1, "0", &reversed, 0)
        );
    }

    #[test]
    fn every_field_feeds_the_hash() {
        let txs = vec![tx("a1", 1.0)];
        let base = hash_block(1, "0", &txs, 0);
        assert_ne!(base, hash_block(2, "0", &txs, 0));
        assert_ne!(base, hash_block(1, "1", &txs, 0));
        assert_ne!(base, hash_block(1, "0", &txs, 1));
        assert_ne!(base, hash_block(1, "0", &[], 0));
    }

    #[test]
    fn difficulty_prefix() {
        assert!(hash_is_valid("0000abcdef"));
        assert!(hash_is_valid("00000000"));
        assert!(!hash_is_valid("000abcdef0"));
        assert!(!hash_is_valid("a0000"));
        assert!(!hash_is_valid(""));
    }

    #[test]
    fn compute_hash_ignores_declared_hash_and_timestamp() {
        let mut b = Block::new(
            1,
            vec![tx("a1", 1.0)],
            7,
            "whatever".into(),
            "0".into(),
            Some(1),
        );
        let h = b.compute_hash();
        b.hash = "something else".into();
        b.timestamp = 99;
        assert_eq!(h, b.compute_hash());
    }
}
