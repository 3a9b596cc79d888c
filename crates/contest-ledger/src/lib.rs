//! Beauty Contest Ledger Service
//!
//! Reference append-only ledger over HTTP. Accepts commit and reveal records
//! on a single endpoint, verifies reveals and publishes the logs.

pub mod config;
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use handlers::*;
pub use state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Records are posted to the endpoint root, like the script URL.
        .route("/", post(submit_record))
        .route("/commits", get(list_commits))
        .route("/reveals", get(list_reveals))
        .route("/results", get(get_results))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
