use std::time::Duration;

use futures::future::join_all;
use log::{debug, warn};
use serde::Serialize;

use super::error::{PeerError, PeerResult};
use super::{
    BLOCKCHAIN_PATH, RECEIVE_NEW_BLOCK_PATH, REGISTER_NODE_BULK_PATH, REGISTER_NODE_PATH,
    TRANSACTION_PATH,
};
use crate::blockchain::{Block, LedgerSnapshot};
use crate::transaction::Transaction;

/// A peer that could not be reached or answered with an error status.
#[derive(Debug, Clone, Serialize)]
pub struct PeerFailure {
    pub peer: String,
    pub error: String,
}

/// Per-peer outcome of one fan-out.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BroadcastReport {
    pub delivered: Vec<String>,
    pub failed: Vec<PeerFailure>,
}

#[derive(Serialize)]
struct RegisterNodeBody<'a> {
    new_node_url: &'a str,
}

#[derive(Serialize)]
struct RegisterNodeBulkBody<'a> {
    new_node_urls: &'a [String],
}

/// Outbound JSON calls to other nodes.
#[derive(Debug, Clone)]
pub struct PeerClient {
    client: reqwest::Client,
}

impl PeerClient {
    pub fn new(timeout: Duration) -> PeerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(PeerError::Client)?;
        Ok(Self { client })
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        peer: &str,
        path: &str,
        body: &B,
    ) -> PeerResult<()> {
        let url = format!("{peer}{path}");
        self.client
            .post(&url)
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn fetch_snapshot(&self, peer: &str) -> PeerResult<LedgerSnapshot> {
        let url = format!("{peer}{BLOCKCHAIN_PATH}");
        let snapshot = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(snapshot)
    }

    pub async fn broadcast_block(&self, peers: &[String], block: &Block) -> BroadcastReport {
        report(fan_out(peers, |peer| self.post(peer, RECEIVE_NEW_BLOCK_PATH, block)).await)
    }

    pub async fn broadcast_transaction(
        &self,
        peers: &[String],
        tx: &Transaction,
    ) -> BroadcastReport {
        report(fan_out(peers, |peer| self.post(peer, TRANSACTION_PATH, tx)).await)
    }

    /// Ask every peer to register `new_node_url`.
    pub async fn broadcast_registration(
        &self,
        peers: &[String],
        new_node_url: &str,
    ) -> BroadcastReport {
        let body = RegisterNodeBody { new_node_url };
        report(fan_out(peers, |peer| self.post(peer, REGISTER_NODE_PATH, &body)).await)
    }

    /// Hand `urls` to a single node in one bulk registration.
    pub async fn register_bulk(&self, peer: &str, urls: &[String]) -> PeerResult<()> {
        let body = RegisterNodeBulkBody { new_node_urls: urls };
        self.post(peer, REGISTER_NODE_BULK_PATH, &body).await
    }

    /// Fetch every peer's ledger. Snapshots keep peer order; unreachable
    /// peers are listed separately.
    pub async fn collect_snapshots(
        &self,
        peers: &[String],
    ) -> (Vec<LedgerSnapshot>, Vec<PeerFailure>) {
        let mut snapshots = Vec::new();
        let mut failed = Vec::new();
        for (peer, result) in fan_out(peers, |peer| self.fetch_snapshot(peer)).await {
            match result {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => failed.push(failure(peer, e)),
            }
        }
        (snapshots, failed)
    }
}

/// Run `call` against every peer concurrently and wait for all of them.
/// Results come back in peer order, one per peer.
async fn fan_out<'a, T, F, Fut>(peers: &'a [String], call: F) -> Vec<(&'a str, PeerResult<T>)>
where
    F: Fn(&'a str) -> Fut,
    Fut: Future<Output = PeerResult<T>>,
{
    let calls = peers.iter().map(|peer| {
        let fut = call(peer.as_str());
        async move { (peer.as_str(), fut.await) }
    });
    join_all(calls).await
}

fn report(results: Vec<(&str, PeerResult<()>)>) -> BroadcastReport {
    let mut out = BroadcastReport::default();
    for (peer, result) in results {
        match result {
            Ok(()) => {
                debug!("delivered to {peer}");
                out.delivered.push(peer.to_string());
            }
            Err(e) => out.failed.push(failure(peer, e)),
        }
    }
    out
}

fn failure(peer: &str, e: PeerError) -> PeerFailure {
    warn!("peer {peer} failed: {e}");
    PeerFailure {
        peer: peer.to_string(),
        error: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Nothing listens on port 1.
    const DEAD_PEER: &str = "http://127.0.0.1:1";

    fn client() -> PeerClient {
        PeerClient::new(Duration::from_secs(2)).expect("client")
    }

    #[actix_web::test]
    async fn empty_peer_set_is_trivially_delivered() {
        let report = client()
            .broadcast_transaction(&[], &Transaction::new("a", "b", 1.0))
            .await;
        assert!(report.failed.is_empty());
        assert!(report.delivered.is_empty());
    }

    #[actix_web::test]
    async fn unreachable_peer_is_reported_not_fatal() {
        let peers = vec![DEAD_PEER.to_string(), "http://127.0.0.1:2".to_string()];
        let report = client().broadcast_block(&peers, &Block::genesis()).await;
        assert!(report.delivered.is_empty());
        assert_eq!(report.failed.len(), 2);
        assert_eq!(report.failed[0].peer, DEAD_PEER);
    }

    #[actix_web::test]
    async fn snapshots_skip_unreachable_peers() {
        let (snapshots, failed) = client()
            .collect_snapshots(&[DEAD_PEER.to_string()])
            .await;
        assert!(snapshots.is_empty());
        assert_eq!(failed.len(), 1);
    }
}
