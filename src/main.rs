//! HTTP server for the matching engine.
//!
//! Endpoints: `GET /health`, `POST /match`. Configuration comes from the environment
//! (`PORT`, `MATCH_INCOMPATIBLE_PENALTY`).

use stable_pairing_engine::api;
use stable_pairing_engine::ServerConfig;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    let _ = env_logger::try_init();
    let config = ServerConfig::from_env();

    let app = api::create_router(config.matching);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await.expect("bind");
    log::info!(
        "listening on http://{} incompatible_penalty={}",
        addr,
        config.matching.incompatible_penalty
    );
    axum::serve(listener, app.into_make_service())
        .await
        .expect("serve");
}
