//! The denormalized price table and the per-card series helpers shared by
//! the analytics transforms.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::CardKey;

// ---------------------------------------------------------------------------
// PriceRecord - One price point joined with its card attributes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub card_id: i64,
    pub name: String,
    pub set_code: String,
    pub number: String,
    pub date: NaiveDate,
    pub source: String,
    pub price: f64,
}

impl PriceRecord {
    pub fn key(&self) -> CardKey {
        CardKey::new(&self.name, &self.set_code, &self.number)
    }
}

// ---------------------------------------------------------------------------
// PriceTable
// ---------------------------------------------------------------------------

/// All price points for all cards, ordered by `(card_id, date)`.
///
/// Rows sharing a card and date keep their incoming relative order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    records: Vec<PriceRecord>,
}

impl PriceTable {
    /// Build a table, sorting records by `(card_id, date)`.
    pub fn new(mut records: Vec<PriceRecord>) -> Self {
        records.sort_by(|a, b| a.card_id.cmp(&b.card_id).then(a.date.cmp(&b.date)));
        Self { records }
    }

    /// Build a table from records the store already returned in order.
    pub fn from_sorted(records: Vec<PriceRecord>) -> Self {
        debug_assert!(records
            .windows(2)
            .all(|w| (w[0].card_id, w[0].date) <= (w[1].card_id, w[1].date)));
        Self { records }
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Latest date across all cards.
    pub fn max_date(&self) -> Option<NaiveDate> {
        self.records.iter().map(|r| r.date).max()
    }

    /// Contiguous per-card slices, in card id order.
    pub fn by_card(&self) -> impl Iterator<Item = &[PriceRecord]> {
        self.records.chunk_by(|a, b| a.card_id == b.card_id)
    }
}

// ---------------------------------------------------------------------------
// Series helpers (all operate on one card's prices in date order)
// ---------------------------------------------------------------------------

pub(crate) fn prices(rows: &[PriceRecord]) -> Vec<f64> {
    rows.iter().map(|r| r.price).collect()
}

/// `p[i] / p[i - periods] - 1`, undefined for the first `periods` rows.
pub(crate) fn pct_change(prices: &[f64], periods: usize) -> Vec<Option<f64>> {
    (0..prices.len())
        .map(|i| {
            if i < periods {
                return None;
            }
            ratio_minus_one(prices[i], prices[i - periods])
        })
        .collect()
}

/// `p[i + 1] / p[i] - 1`, undefined for the last row.
pub(crate) fn forward_return(prices: &[f64]) -> Vec<Option<f64>> {
    (0..prices.len())
        .map(|i| prices.get(i + 1).and_then(|next| ratio_minus_one(*next, prices[i])))
        .collect()
}

/// Simple moving average requiring a full window.
pub(crate) fn rolling_mean(prices: &[f64], window: usize) -> Vec<Option<f64>> {
    (0..prices.len())
        .map(|i| {
            if window == 0 || i + 1 < window {
                return None;
            }
            let slice = &prices[i + 1 - window..=i];
            Some(slice.iter().sum::<f64>() / window as f64)
        })
        .collect()
}

fn ratio_minus_one(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator - 1.0)
    }
}

/// Descending order for floats; incomparable values sort last.
pub(crate) fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Ascending order for floats; incomparable values sort last.
pub(crate) fn asc(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
