mod chain;
mod health;
pub mod models;
mod nodes;
mod tx;

use actix_web::web::{self, ServiceConfig};

use crate::network::API_PREFIX;

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope(API_PREFIX)
            .service(health::health_check)
            .service(chain::get_blockchain)
            .service(chain::validate_chain)
            .service(chain::mine_block)
            .service(chain::receive_new_block)
            .service(chain::consensus)
            .service(nodes::register_and_broadcast_node)
            .service(nodes::register_node)
            .service(nodes::register_node_bulk)
            .service(tx::post_transaction)
            .service(tx::broadcast_transaction)
            .service(tx::get_mempool),
    );
}
