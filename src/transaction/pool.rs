use std::collections::HashSet;

use super::model::Transaction;

/// Pending transactions waiting to be mined, kept in arrival order.
/// No funds, signature or duplicate-id checks are made on insert.
#[derive(Debug, Default, Clone)]
pub struct TransactionPool {
    pending: Vec<Transaction>,
}

impl TransactionPool {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub fn push(&mut self, tx: Transaction) {
        self.pending.push(tx);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.pending
    }

    /// Owned copy of the current contents (what a miner works on).
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.pending.clone()
    }

    /// Swap in a whole new pool, used when a remote ledger is adopted.
    pub fn replace(&mut self, pending: Vec<Transaction>) {
        self.pending = pending;
    }

    /// Drop every pending transaction whose id appears in `included`.
    /// Returns how many were removed.
    pub fn remove_included(&mut self, included: &[Transaction]) -> usize {
        let ids: HashSet<&str> = included.iter().map(|t| t.id.as_str()).collect();
        let before = self.pending.len();
        self.pending.retain(|t| !ids.contains(t.id.as_str()));
        before - self.pending.len()
    }
}
