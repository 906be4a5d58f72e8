use actix_web::{HttpResponse, Responder, post, web};
use log::{debug, info, warn};

use super::models::{
    AppState, RegisterAndBroadcastResponse, RegisterNodeBulkRequest, RegisterNodeRequest,
    RegisterNodeResponse,
};

/// Register a node with the whole network:
/// - ask every known peer to register it
/// - register it here
/// - hand it our peers plus our own address in one bulk call
#[post("/register-and-broadcast-node/")]
pub async fn register_and_broadcast_node(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodeRequest>,
) -> impl Responder {
    let new_node_url = body.new_node_url.trim().to_string();
    if new_node_url.is_empty() {
        return HttpResponse::BadRequest().body("new_node_url required");
    }

    let peers = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.peers().to_vec()
    };
    let broadcast = state
        .peers
        .broadcast_registration(&peers, &new_node_url)
        .await;

    let known = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        if !ledger.add_peer(&new_node_url) {
            debug!("{new_node_url} is already known or is this node");
        }
        let mut known = ledger.peers().to_vec();
        known.push(ledger.url().to_string());
        known
    };

    let bulk_registration_error = match state.peers.register_bulk(&new_node_url, &known).await {
        Ok(()) => None,
        Err(e) => {
            warn!("bulk registration on {new_node_url} failed: {e}");
            Some(e.to_string())
        }
    };
    info!(
        "registered {new_node_url} (broadcast to {}/{} peers)",
        broadcast.delivered.len(),
        peers.len()
    );

    HttpResponse::Ok().json(RegisterAndBroadcastResponse {
        status: "New node registered successfully.",
        broadcast,
        bulk_registration_error,
    })
}

/// Register a single node locally.
#[post("/register-node/")]
pub async fn register_node(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodeRequest>,
) -> impl Responder {
    let added = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.add_peer(body.new_node_url.trim())
    };
    debug!("register-node {} (added={added})", body.new_node_url);

    HttpResponse::Ok().json(RegisterNodeResponse {
        status: "New node registered successfully.",
        added: usize::from(added),
    })
}

/// Register several nodes locally.
#[post("/register-node-bulk/")]
pub async fn register_node_bulk(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodeBulkRequest>,
) -> impl Responder {
    let added = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        body.new_node_urls
            .iter()
            .filter(|url| ledger.add_peer(url.trim()))
            .count()
    };
    debug!(
        "register-node-bulk: {added} of {} added",
        body.new_node_urls.len()
    );

    HttpResponse::Ok().json(RegisterNodeResponse {
        status: "New nodes registered successfully.",
        added,
    })
}
