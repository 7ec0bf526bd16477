use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use poke_pricer::models::{Card, PricePoint};
use poke_pricer::queries::{cards::DEFAULT_SEARCH_LIMIT, SearchCardsParams};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

/// GET /v1/cards/search?q=pik&limit=20
///
/// Case-insensitive name substring search, ordered by id.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Card>>, AppError> {
    let search = SearchCardsParams {
        name: params.q.filter(|q| !q.trim().is_empty()),
        limit: Some(params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT)),
        ..Default::default()
    };
    Ok(Json(state.pricer.search_cards(search).await?))
}

/// GET /v1/cards/{id}
pub async fn get_card(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Card>, AppError> {
    Ok(Json(state.pricer.card(id).await?))
}

#[derive(Deserialize)]
pub struct PricesParams {
    pub limit: Option<usize>,
}

/// GET /v1/cards/{id}/prices?limit=30
///
/// Price history, newest first.
pub async fn card_prices(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<PricesParams>,
) -> Result<Json<Vec<PricePoint>>, AppError> {
    Ok(Json(state.pricer.card_prices(id, params.limit).await?))
}
