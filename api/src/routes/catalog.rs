use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use poke_pricer::models::CatalogSummary;

use crate::error::AppError;
use crate::state::AppState;

/// GET /v1/catalog/summary
///
/// Counts, date range and sources; zeros and empty strings without data.
pub async fn summary(State(state): State<Arc<AppState>>) -> Result<Json<CatalogSummary>, AppError> {
    Ok(Json(state.pricer.catalog_summary().await?))
}
