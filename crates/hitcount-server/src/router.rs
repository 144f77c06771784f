//! Axum router wiring.
//!
//! Layers, outermost first: timing/logging, then CORS (any origin), then routes.

use axum::{
    middleware,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::{api, app_state::AppState, obs, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::welcome))
        .route("/count", get(api::count_from_header).post(api::count_from_body))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .layer(cors_layer())
        .layer(middleware::from_fn(obs::track))
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
