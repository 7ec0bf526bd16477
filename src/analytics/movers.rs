//! Single-day winners and losers by 1-day return.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::table::{asc, desc, pct_change, prices, PriceTable};
use crate::export::CsvRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Winner,
    Loser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoverRow {
    pub card_id: i64,
    pub name: String,
    pub set_code: String,
    pub number: String,
    pub source: String,
    pub price: f64,
    pub return_1d: f64,
    pub date: NaiveDate,
    pub bucket: Bucket,
}

impl CsvRow for MoverRow {
    const COLUMNS: &'static [&'static str] = &[
        "card_id", "name", "set_code", "number", "source", "price", "return_1d", "date", "bucket",
    ];
}

/// Top `k` winners and losers on `on_date` (default: the table's latest date).
///
/// A card's 1-day return compares a row with the card's previous
/// observation; rows without one are excluded. Winners come first sorted by
/// return descending, then losers sorted ascending. With fewer than `2k`
/// qualifying rows a card may appear in both buckets.
pub fn compute_top_movers(
    table: &PriceTable,
    k: usize,
    on_date: Option<NaiveDate>,
) -> Vec<MoverRow> {
    let Some(day) = on_date.or_else(|| table.max_date()) else {
        return Vec::new();
    };

    let mut today: Vec<(f64, usize)> = Vec::new();
    let mut offset = 0;
    for card_rows in table.by_card() {
        let ret = pct_change(&prices(card_rows), 1);
        for (i, record) in card_rows.iter().enumerate() {
            if record.date == day {
                if let Some(r) = ret[i] {
                    today.push((r, offset + i));
                }
            }
        }
        offset += card_rows.len();
    }

    let mut winners = today.clone();
    winners.sort_by(|a, b| desc(a.0, b.0));
    let mut losers = today;
    losers.sort_by(|a, b| asc(a.0, b.0));

    let records = table.records();
    let tagged = winners
        .into_iter()
        .take(k)
        .map(|m| (m, Bucket::Winner))
        .chain(losers.into_iter().take(k).map(|m| (m, Bucket::Loser)));

    tagged
        .map(|((ret, idx), bucket)| {
            let r = &records[idx];
            MoverRow {
                card_id: r.card_id,
                name: r.name.clone(),
                set_code: r.set_code.clone(),
                number: r.number.clone(),
                source: r.source.clone(),
                price: r.price,
                return_1d: ret,
                date: r.date,
                bucket,
            }
        })
        .collect()
}
