//! Cross-sectional momentum backtest.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::table::{desc, forward_return, pct_change, prices, PriceTable};
use crate::error::{PricerError, Result};
use crate::export::CsvRow;

pub const DEFAULT_LOOKBACK: usize = 14;
pub const DEFAULT_TOP_K: usize = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRow {
    pub date: NaiveDate,
    pub portfolio_return: f64,
    pub equity: f64,
}

impl CsvRow for BacktestRow {
    const COLUMNS: &'static [&'static str] = &["date", "portfolio_return", "equity"];
}

/// Long-only top-K momentum strategy, rebalanced every date.
///
/// On each date, cards with both a trailing momentum (`lookback`
/// observations) and a next-observation return are ranked by momentum; the
/// equal-weighted mean next return of the top `top_k` is that date's
/// portfolio return. Dates without eligible cards are omitted. Equity is the
/// running product of `1 + portfolio_return`.
pub fn backtest_momentum_topk(
    table: &PriceTable,
    lookback: usize,
    top_k: usize,
) -> Result<Vec<BacktestRow>> {
    if top_k == 0 {
        return Err(PricerError::InvalidArgument(
            "top_k must be at least 1".to_string(),
        ));
    }

    // date -> (momentum, forward return) in table order
    let mut by_date: BTreeMap<NaiveDate, Vec<(f64, f64)>> = BTreeMap::new();
    for card_rows in table.by_card() {
        let px = prices(card_rows);
        let mom = pct_change(&px, lookback);
        let fwd = forward_return(&px);
        for (i, record) in card_rows.iter().enumerate() {
            if let (Some(m), Some(f)) = (mom[i], fwd[i]) {
                by_date.entry(record.date).or_default().push((m, f));
            }
        }
    }

    let mut out = Vec::with_capacity(by_date.len());
    let mut equity = 1.0;
    for (date, mut picks) in by_date {
        picks.sort_by(|a, b| desc(a.0, b.0));
        picks.truncate(top_k);
        let portfolio_return = picks.iter().map(|p| p.1).sum::<f64>() / picks.len() as f64;
        equity *= 1.0 + portfolio_return;
        out.push(BacktestRow {
            date,
            portfolio_return,
            equity,
        });
    }

    Ok(out)
}
