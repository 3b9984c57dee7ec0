pub mod assets;
pub mod export;
pub mod health;
pub mod pnl;

use crate::orchestration::PnlService;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PnlService>,
}

impl AppState {
    pub fn new(service: Arc<PnlService>) -> Self {
        Self { service }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/assets", get(assets::get_assets))
        .route("/v1/pnl", get(pnl::get_pnl))
        .route("/v1/pnl/total", get(pnl::get_pnl_total))
        .route("/v1/pnl/markets/:asset", get(pnl::get_market_pnl))
        .route("/v1/pnl/export", get(export::get_export))
        .layer(cors)
        .with_state(state)
}
