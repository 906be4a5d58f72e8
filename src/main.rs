use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;

use rust_ledger_node::api::{self, AppState};
use rust_ledger_node::config::NodeConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = NodeConfig::from_env();
    info!(
        "⛓️ Node {} listening at {} (bind {}:{})",
        config.node_address, config.node_url, config.host, config.port
    );

    let state = AppState::new(&config).map_err(std::io::Error::other)?;
    let state = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
