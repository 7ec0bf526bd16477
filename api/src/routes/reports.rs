use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use chrono::NaiveDate;
use poke_pricer::analytics::MoverRow;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TopMoversParams {
    pub k: Option<i64>,
    pub on_date: Option<String>,
}

/// GET /v1/reports/top-movers?k=5&on_date=YYYY-MM-DD
///
/// Top-K winners followed by top-K losers; an empty list without data.
pub async fn top_movers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopMoversParams>,
) -> Result<Json<Vec<MoverRow>>, AppError> {
    let k = params.k.unwrap_or(5);
    if k < 1 {
        return Err(AppError::bad_request("k must be >= 1"));
    }

    let on_date = match params.on_date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) => Some(NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
            AppError::bad_request(format!("invalid on_date {s:?}, expected YYYY-MM-DD"))
        })?),
    };

    let movers = state.pricer.top_movers(k as usize, on_date).await?;
    Ok(Json(movers))
}
