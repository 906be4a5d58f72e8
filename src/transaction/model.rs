use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sender used for mining-reward transactions.
pub const NETWORK_SENDER: &str = "NETWORK";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    /// Not checked against any balance.
    pub amount: f64,
    /// Dash-less UUID v4, assigned once at creation.
    pub id: String,
}

impl Transaction {
    /// Build a transaction with a fresh unique id.
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: f64) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
            id: Uuid::new_v4().simple().to_string(),
        }
    }

    /// Mining reward paid by the network to `recipient`.
    pub fn reward(recipient: impl Into<String>, amount: f64) -> Self {
        Self::new(NETWORK_SENDER, recipient, amount)
    }
}
