use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, info, warn};

use super::models::{AppState, BroadcastTxResponse, MempoolResponse, NewTxRequest, NewTxResponse};
use crate::transaction::Transaction;

/// Pool a transaction as-is (sent by a peer or a client). No funds check.
#[post("/transaction/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<Transaction>,
) -> impl Responder {
    let tx = body.into_inner();
    let txid = tx.id.clone();
    let block_index = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.add_transaction_to_pool(tx)
    };
    debug!("POST /transaction/ - txid={txid} pooled for block #{block_index}");

    HttpResponse::Ok().json(NewTxResponse {
        status: "Transaction created successfully.",
        block_index,
    })
}

/// Create a transaction, broadcast it to every peer, then pool it here.
#[post("/transaction/broadcast/")]
pub async fn broadcast_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> impl Responder {
    let sender = body.sender.trim();
    let recipient = body.recipient.trim();
    if sender.is_empty() || recipient.is_empty() {
        warn!("POST /transaction/broadcast/ - rejected: blank sender or recipient");
        return HttpResponse::BadRequest().body("sender and recipient required");
    }

    let (transaction, peers) = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        (
            ledger.create_transaction(sender, recipient, body.amount),
            ledger.peers().to_vec(),
        )
    };

    let broadcast = state.peers.broadcast_transaction(&peers, &transaction).await;
    let block_index = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.add_transaction_to_pool(transaction.clone())
    };
    info!(
        "POST /transaction/broadcast/ - txid={} sent to {}/{} peers",
        transaction.id,
        broadcast.delivered.len(),
        peers.len()
    );

    HttpResponse::Ok().json(BroadcastTxResponse {
        status: "Transaction created and broadcast successfully.",
        transaction,
        block_index,
        broadcast,
    })
}

/// List pending transactions.
#[get("/mempool/")]
pub async fn get_mempool(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    let transactions = ledger.pending_transactions().to_vec();
    HttpResponse::Ok().json(MempoolResponse {
        size: transactions.len(),
        transactions,
    })
}
