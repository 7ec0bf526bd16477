//! Day-level anomaly flags: large 1-day moves and breaks of the trailing range.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::table::{pct_change, prices, PriceTable};
use crate::error::{PricerError, Result};
use crate::export::CsvRow;

pub const DEFAULT_THRESHOLD: f64 = 0.10;
pub const DEFAULT_LOOKBACK: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyFlag {
    Spike,
    NewHigh,
    NewLow,
}

impl AnomalyFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyFlag::Spike => "spike",
            AnomalyFlag::NewHigh => "new_high",
            AnomalyFlag::NewLow => "new_low",
        }
    }
}

impl fmt::Display for AnomalyFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRow {
    pub card_id: i64,
    pub name: String,
    pub set_code: String,
    pub number: String,
    pub source: String,
    pub price: f64,
    pub return_1d: f64,
    /// Comma-joined flags, e.g. `spike,new_high`.
    pub flag: String,
    pub date: NaiveDate,
}

impl AnomalyRow {
    pub fn flags(&self) -> Vec<&str> {
        self.flag.split(',').filter(|f| !f.is_empty()).collect()
    }

    pub fn has_flag(&self, flag: AnomalyFlag) -> bool {
        self.flags().contains(&flag.as_str())
    }
}

impl CsvRow for AnomalyRow {
    const COLUMNS: &'static [&'static str] = &[
        "card_id", "name", "set_code", "number", "source", "price", "return_1d", "flag", "date",
    ];
}

/// Flag rows on `on_date` (default: the table's latest date).
///
/// * `spike` when `|return_1d| >= threshold`
/// * `new_high` / `new_low` when the price is strictly above / below every
///   price in the card's previous `lookback` observations
///
/// Rows without a previous observation are never flagged. Only flagged rows
/// are returned.
pub fn scan_anomalies(
    table: &PriceTable,
    threshold: f64,
    lookback: usize,
    on_date: Option<NaiveDate>,
) -> Result<Vec<AnomalyRow>> {
    if lookback == 0 {
        return Err(PricerError::InvalidArgument(
            "lookback must be at least 1".to_string(),
        ));
    }
    let Some(day) = on_date.or_else(|| table.max_date()) else {
        return Ok(Vec::new());
    };

    let mut out = Vec::new();
    for card_rows in table.by_card() {
        let px = prices(card_rows);
        let ret = pct_change(&px, 1);

        for (i, record) in card_rows.iter().enumerate() {
            if record.date != day {
                continue;
            }
            let Some(r) = ret[i] else { continue };

            let prior = &px[i.saturating_sub(lookback)..i];
            let prior_max = prior.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let prior_min = prior.iter().cloned().fold(f64::INFINITY, f64::min);

            let mut flags = Vec::new();
            if r.abs() >= threshold {
                flags.push(AnomalyFlag::Spike);
            }
            if record.price > prior_max {
                flags.push(AnomalyFlag::NewHigh);
            }
            if record.price < prior_min {
                flags.push(AnomalyFlag::NewLow);
            }
            if flags.is_empty() {
                continue;
            }

            out.push(AnomalyRow {
                card_id: record.card_id,
                name: record.name.clone(),
                set_code: record.set_code.clone(),
                number: record.number.clone(),
                source: record.source.clone(),
                price: record.price,
                return_1d: r,
                flag: flags.iter().map(AnomalyFlag::as_str).collect::<Vec<_>>().join(","),
                date: record.date,
            });
        }
    }

    Ok(out)
}
