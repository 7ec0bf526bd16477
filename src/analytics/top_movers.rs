//! Cross-sectional ranking of cards by return over a trailing window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::table::{desc, pct_change, prices, PriceTable};
use crate::export::CsvRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowMoverRow {
    pub window_days: usize,
    pub rank: usize,
    pub card_id: i64,
    pub name: String,
    pub set_code: String,
    pub number: String,
    pub last_date: NaiveDate,
    pub last_price: f64,
    pub ret_window: f64,
}

impl CsvRow for WindowMoverRow {
    const COLUMNS: &'static [&'static str] = &[
        "window_days",
        "rank",
        "card_id",
        "name",
        "set_code",
        "number",
        "last_date",
        "last_price",
        "ret_window",
    ];
}

/// Rank cards by percent change over `window_days` observations, measured at
/// each card's own latest row. Cards without enough history are dropped.
/// `top_k == 0` keeps every ranked card.
pub fn compute_window_movers(
    table: &PriceTable,
    window_days: usize,
    top_k: usize,
) -> Vec<WindowMoverRow> {
    let mut latest: Vec<(f64, &crate::analytics::PriceRecord)> = Vec::new();

    for card_rows in table.by_card() {
        let ret = pct_change(&prices(card_rows), window_days);
        let Some(max_date) = card_rows.iter().map(|r| r.date).max() else {
            continue;
        };
        // first row at the card's latest date
        let Some(idx) = card_rows.iter().position(|r| r.date == max_date) else {
            continue;
        };
        if let Some(r) = ret[idx] {
            latest.push((r, &card_rows[idx]));
        }
    }

    latest.sort_by(|a, b| desc(a.0, b.0));
    if top_k > 0 {
        latest.truncate(top_k);
    }

    latest
        .into_iter()
        .enumerate()
        .map(|(i, (ret, r))| WindowMoverRow {
            window_days,
            rank: i + 1,
            card_id: r.card_id,
            name: r.name.clone(),
            set_code: r.set_code.clone(),
            number: r.number.clone(),
            last_date: r.date,
            last_price: r.price,
            ret_window: ret,
        })
        .collect()
}
