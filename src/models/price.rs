use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PricePoint - One dated, sourced observation (unique on card, date, source)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub id: i64,
    pub card_id: i64,
    pub date: NaiveDate,
    pub source: String,
    pub price: f64,
}

// ---------------------------------------------------------------------------
// CatalogSummary - Dataset counts, date range and sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub total_cards: i64,
    pub total_prices: i64,
    pub min_date: String,
    pub max_date: String,
    pub sources: String,
}
