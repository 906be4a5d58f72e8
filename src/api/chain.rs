use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, info, warn};

use super::models::{
    AppState, ConsensusResponse, MineResponse, ReceiveBlockResponse, StatusResponse,
    ValidateResponse,
};
use crate::blockchain::{Block, MINING_REWARD, block_can_be_appended};
use crate::transaction::Transaction;

/// Full ledger snapshot of this node (also what peers fetch for consensus).
#[get("/blockchain/")]
pub async fn get_blockchain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(ledger.snapshot())
}

/// Validate the local chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(ValidateResponse {
        valid: ledger.chain_is_valid(ledger.chain()),
        length: ledger.len(),
    })
}

/// Mine the pending pool as captured now:
/// - run PoW on a blocking thread, cancelled if the tip moves
/// - broadcast the block, then the mining reward, to every peer
/// - append locally and pool the reward
#[get("/mine/")]
pub async fn mine_block(state: web::Data<AppState>) -> impl Responder {
    let job = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.mining_job()
    };
    info!(
        "MINER - mining block #{} ({} txs)",
        job.index,
        job.transactions.len()
    );

    let cancel = state.mining.start();
    let search = job.clone();
    let nonce = match web::block(move || search.solve(&cancel)).await {
        Ok(Some(nonce)) => nonce,
        Ok(None) => {
            warn!("MINER - block #{} abandoned: chain tip changed", job.index);
            return HttpResponse::Conflict().json(StatusResponse {
                status: "Mining aborted: chain tip changed.",
            });
        }
        Err(e) => {
            warn!("MINER - search thread failed: {e}");
            return HttpResponse::InternalServerError().body(e.to_string());
        }
    };

    let block = job.into_block(nonce);
    info!(
        "MINER - sealed block #{} (hash={}, nonce={})",
        block.index, block.hash, block.nonce
    );

    let peers = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        if !block_can_be_appended(ledger.last_block(), &block) {
            warn!("MINER - block #{} is stale, not broadcasting", block.index);
            return HttpResponse::Conflict().json(StatusResponse {
                status: "Mined block is stale: chain tip changed.",
            });
        }
        ledger.peers().to_vec()
    };

    let block_broadcast = state.peers.broadcast_block(&peers, &block).await;
    let reward = Transaction::reward(&state.node_address, MINING_REWARD);
    let reward_broadcast = state.peers.broadcast_transaction(&peers, &reward).await;

    {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        if !ledger.try_append_block(block.clone()) {
            warn!("MINER - block #{} lost the race to a peer block", block.index);
            return HttpResponse::Conflict().json(StatusResponse {
                status: "Mined block is stale: chain tip changed.",
            });
        }
        ledger.add_transaction_to_pool(reward);
    }

    HttpResponse::Ok().json(MineResponse {
        status: "New block mined successfully.",
        block,
        block_broadcast,
        reward_broadcast,
    })
}

/// Block pushed by a peer. Appended only if it extends our tip; a
/// rejected block is not an error.
#[post("/receive-new-block/")]
pub async fn receive_new_block(
    state: web::Data<AppState>,
    body: web::Json<Block>,
) -> impl Responder {
    let block = body.into_inner();
    let index = block.index;
    let accepted = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.try_append_block(block)
    };

    let status = if accepted {
        state.mining.cancel();
        info!("received block #{index}, appended");
        "New block received and appended."
    } else {
        debug!("received block #{index}, does not extend our tip");
        "New block received but not appended."
    };
    HttpResponse::Ok().json(ReceiveBlockResponse { status, accepted })
}

/// Longest-valid-chain resolution against every peer.
#[get("/consensus/")]
pub async fn consensus(state: web::Data<AppState>) -> impl Responder {
    let peers = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.peers().to_vec()
    };
    let (candidates, unreachable) = state.peers.collect_snapshots(&peers).await;
    debug!(
        "consensus: {} snapshots, {} unreachable peers",
        candidates.len(),
        unreachable.len()
    );

    let (replaced, length) = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        let replaced = ledger.resolve_consensus(&candidates);
        (replaced, ledger.len())
    };
    if replaced {
        state.mining.cancel();
    }

    HttpResponse::Ok().json(ConsensusResponse {
        status: if replaced {
            "Blockchain has been updated."
        } else {
            "Blockchain is already up to date."
        },
        replaced,
        length,
        unreachable,
    })
}
