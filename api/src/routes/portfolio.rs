use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use poke_pricer::portfolio::{HoldingRequest, PortfolioValuation};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PortfolioBody {
    #[serde(default)]
    pub holdings: Vec<HoldingRequest>,
}

/// POST /v1/portfolio/value
///
/// Body: `{"holdings": [{"card_id": 2, "quantity": 3.0}]}`. Unknown card ids
/// are listed under `missing_card_ids`.
pub async fn value(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PortfolioBody>,
) -> Result<Json<PortfolioValuation>, AppError> {
    Ok(Json(state.pricer.value_holdings(body.holdings).await?))
}
