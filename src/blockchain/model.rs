use serde::{Deserialize, Serialize};

use super::consensus::longest_candidate;
use super::pow::MiningJob;
use super::validation::{block_can_be_appended, chain_is_valid};
use super::Block;
use crate::network::PeerRegistry;
use crate::transaction::{Transaction, TransactionPool};

/// Serialized view of a ledger, as exchanged between nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub node_url: String,
    pub chain: Vec<Block>,
    pub pending_transactions: Vec<Transaction>,
    pub network: Vec<String>,
}

/// One node's view of the ledger: the chain, the pending pool and the
/// peers it talks to. Owned by the node; nothing here is global.
#[derive(Debug)]
pub struct Ledger {
    genesis: Block,
    chain: Vec<Block>,
    pending: TransactionPool,
    peers: PeerRegistry,
}

impl Ledger {
    /// Start a ledger for the node reachable at `url`, genesis appended.
    pub fn new(url: impl Into<String>) -> Self {
        let genesis = Block::genesis();
        let mut ledger = Self {
            genesis: genesis.clone(),
            chain: Vec::new(),
            pending: TransactionPool::new(),
            peers: PeerRegistry::new(url),
        };
        ledger.append_block(genesis);
        ledger
    }

    pub fn url(&self) -> &str {
        self.peers.own_url()
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn pending_transactions(&self) -> &[Transaction] {
        self.pending.as_slice()
    }

    pub fn peers(&self) -> &PeerRegistry {
        &self.peers
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("ledger always holds at least the genesis block")
    }

    /// Build the next block from the current pending pool. Does not append.
    pub fn create_block(
        &self,
        nonce: u64,
        hash: String,
        previous_block_hash: String,
        timestamp: Option<i64>,
    ) -> Block {
        Block::new(
            self.chain.len() as u64,
            self.pending.snapshot(),
            nonce,
            hash,
            previous_block_hash,
            timestamp,
        )
    }

    /// Append without checks, then drop the pending transactions the
    /// block carries. Transactions it does not carry stay pending.
    pub fn append_block(&mut self, block: Block) {
        let removed = self.pending.remove_included(&block.transactions);
        log::debug!(
            "appended block #{} ({} txs, {} removed from pool, {} still pending)",
            block.index,
            block.transactions.len(),
            removed,
            self.pending.len()
        );
        self.chain.push(block);
    }

    /// Append `block` only if it extends the current tip.
    pub fn try_append_block(&mut self, block: Block) -> bool {
        if !block_can_be_appended(self.last_block(), &block) {
            return false;
        }
        self.append_block(block);
        true
    }

    /// Validate a whole chain against this node's genesis.
    pub fn chain_is_valid(&self, chain: &[Block]) -> bool {
        chain_is_valid(&self.genesis, chain)
    }

    /// Capture what the next mined block will seal.
    pub fn mining_job(&self) -> MiningJob {
        let last = self.last_block();
        MiningJob {
            index: last.index + 1,
            previous_block_hash: last.hash.clone(),
            transactions: self.pending.snapshot(),
        }
    }

    pub fn add_peer(&mut self, address: &str) -> bool {
        self.peers.add(address)
    }

    pub fn is_peer(&self, address: &str) -> bool {
        self.peers.contains(address)
    }

    pub fn create_transaction(
        &self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: f64,
    ) -> Transaction {
        Transaction::new(sender, recipient, amount)
    }

    /// Queue `tx` and return the index of the block it would be mined into.
    pub fn add_transaction_to_pool(&mut self, tx: Transaction) -> u64 {
        self.pending.push(tx);
        self.last_block().index + 1
    }

    /// Adopt the longest remote chain if it is strictly longer than ours
    /// and valid; its pending pool comes with it. Returns whether
    /// anything changed.
    pub fn resolve_consensus(&mut self, candidates: &[LedgerSnapshot]) -> bool {
        let Some(best) = longest_candidate(self.chain.len(), candidates) else {
            return false;
        };
        if !self.chain_is_valid(&best.chain) {
            log::warn!(
                "consensus: longest chain from {} ({} blocks) is invalid, keeping ours",
                best.node_url,
                best.chain.len()
            );
            return false;
        }
        log::info!(
            "consensus: adopting chain from {} ({} -> {} blocks)",
            best.node_url,
            self.chain.len(),
            best.chain.len()
        );
        self.chain = best.chain.clone();
        self.pending.replace(best.pending_transactions.clone());
        true
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            node_url: self.url().to_string(),
            chain: self.chain.clone(),
            pending_transactions: self.pending.snapshot(),
            network: self.peers.to_vec(),
        }
    }
}
