//! HTTP adapter over the price database.

pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

pub use error::AppError;
pub use state::AppState;

/// All routes, with permissive CORS.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/v1/catalog/summary", get(routes::catalog::summary))
        .route("/v1/reports/top-movers", get(routes::reports::top_movers))
        .route("/v1/cards/search", get(routes::cards::search))
        .route("/v1/cards/{id}", get(routes::cards::get_card))
        .route("/v1/cards/{id}/prices", get(routes::cards::card_prices))
        .route("/v1/portfolio/value", post(routes::portfolio::value))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
