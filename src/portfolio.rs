//! Watchlist and holdings valuation against the latest known prices.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::{PriceRecord, PriceTable};
use crate::error::Result;
use crate::export::CsvRow;
use crate::ingest::HeaderMap;
use crate::models::CardKey;

const KEY_COLUMNS: [&str; 3] = ["name", "set_code", "number"];
const HOLDING_COLUMNS: [&str; 5] = ["name", "set_code", "number", "qty", "cost_per_unit"];

/// Latest record per `(name, set_code, number)`.
///
/// Among rows sharing the latest date, the last one in table order wins.
pub fn latest_by_key(table: &PriceTable) -> HashMap<CardKey, &PriceRecord> {
    let mut latest: HashMap<CardKey, &PriceRecord> = HashMap::new();
    for r in table.records() {
        latest
            .entry(r.key())
            .and_modify(|cur| {
                if r.date >= cur.date {
                    *cur = r;
                }
            })
            .or_insert(r);
    }
    latest
}

/// Latest record per card id, with the same tie rule as [`latest_by_key`].
pub fn latest_by_card(table: &PriceTable) -> HashMap<i64, &PriceRecord> {
    let mut latest: HashMap<i64, &PriceRecord> = HashMap::new();
    for r in table.records() {
        latest
            .entry(r.card_id)
            .and_modify(|cur| {
                if r.date >= cur.date {
                    *cur = r;
                }
            })
            .or_insert(r);
    }
    latest
}

fn reader(path: &Path, required: &[&str]) -> Result<(csv::Reader<std::fs::File>, HeaderMap)> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let headers = HeaderMap::from_headers(rdr.headers()?, required)?;
    Ok((rdr, headers))
}

// ---------------------------------------------------------------------------
// Watchlist
// ---------------------------------------------------------------------------

/// Read a watchlist CSV (`name,set_code,number`).
pub fn read_watchlist(path: &Path) -> Result<Vec<CardKey>> {
    let (mut rdr, headers) = reader(path, &KEY_COLUMNS)?;
    let mut out = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let field = |name: &str| headers.get(&record, name).unwrap_or("").to_string();
        out.push(CardKey::new(field("name"), field("set_code"), field("number")));
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistRow {
    pub card_id: Option<i64>,
    pub name: String,
    pub set_code: String,
    pub number: String,
    pub source: Option<String>,
    pub price: Option<f64>,
    pub date: Option<NaiveDate>,
}

impl CsvRow for WatchlistRow {
    const COLUMNS: &'static [&'static str] =
        &["card_id", "name", "set_code", "number", "source", "price", "date"];
}

/// Attach the latest price to each watched card; unknown cards get blanks.
pub fn watchlist_latest_prices(table: &PriceTable, watchlist: &[CardKey]) -> Vec<WatchlistRow> {
    let latest = latest_by_key(table);
    watchlist
        .iter()
        .map(|key| {
            let hit = latest.get(key);
            WatchlistRow {
                card_id: hit.map(|r| r.card_id),
                name: key.name.clone(),
                set_code: key.set_code.clone(),
                number: key.number.clone(),
                source: hit.map(|r| r.source.clone()),
                price: hit.map(|r| r.price),
                date: hit.map(|r| r.date),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Holdings CSV
// ---------------------------------------------------------------------------

/// One line of a holdings CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub key: CardKey,
    pub qty: f64,
    pub cost_per_unit: f64,
}

/// Read a holdings CSV (`name,set_code,number,qty,cost_per_unit`).
///
/// Non-numeric quantities and costs are read as 0.
pub fn read_holdings(path: &Path) -> Result<Vec<Holding>> {
    let (mut rdr, headers) = reader(path, &HOLDING_COLUMNS)?;
    let mut out = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let field = |name: &str| headers.get(&record, name).unwrap_or("");
        let number = |name: &str| {
            field(name)
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .unwrap_or(0.0)
        };
        out.push(Holding {
            key: CardKey::new(field("name"), field("set_code"), field("number")),
            qty: number("qty"),
            cost_per_unit: number("cost_per_unit"),
        });
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingValuation {
    pub name: String,
    pub set_code: String,
    pub number: String,
    pub qty: f64,
    pub price: Option<f64>,
    pub date: Option<NaiveDate>,
    pub market_value: f64,
    pub cost_per_unit: f64,
    pub pnl: f64,
    /// Undefined when the cost basis is zero or the card has no price.
    pub pct_return: Option<f64>,
}

impl CsvRow for HoldingValuation {
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "set_code",
        "number",
        "qty",
        "price",
        "date",
        "market_value",
        "cost_per_unit",
        "pnl",
        "pct_return",
    ];
}

/// Value each holding at its card's latest price.
///
/// Unpriced holdings contribute a market value of 0 and a P&L of
/// `-cost_per_unit * qty`.
pub fn value_holdings_csv(table: &PriceTable, holdings: &[Holding]) -> Vec<HoldingValuation> {
    let latest = latest_by_key(table);
    holdings
        .iter()
        .map(|h| {
            let hit = latest.get(&h.key);
            let price = hit.map(|r| r.price);
            let px = price.unwrap_or(0.0);
            let pct_return = match price {
                Some(p) if h.cost_per_unit != 0.0 => Some((p - h.cost_per_unit) / h.cost_per_unit),
                _ => None,
            };
            HoldingValuation {
                name: h.key.name.clone(),
                set_code: h.key.set_code.clone(),
                number: h.key.number.clone(),
                qty: h.qty,
                price,
                date: hit.map(|r| r.date),
                market_value: px * h.qty,
                cost_per_unit: h.cost_per_unit,
                pnl: (px - h.cost_per_unit) * h.qty,
                pct_return,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Holdings by card id
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingRequest {
    pub card_id: i64,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub card_id: i64,
    pub name: String,
    pub set_code: String,
    pub number: String,
    pub quantity: f64,
    pub price: f64,
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValuation {
    pub total_value: f64,
    pub positions: Vec<Position>,
    pub missing_card_ids: Vec<i64>,
}

/// Value holdings keyed by card id. Ids without any price point are listed
/// in `missing_card_ids` instead of failing the request.
pub fn value_holdings(table: &PriceTable, holdings: &[HoldingRequest]) -> PortfolioValuation {
    let latest = latest_by_card(table);
    let mut out = PortfolioValuation::default();

    for h in holdings {
        match latest.get(&h.card_id) {
            Some(r) => {
                let value = r.price * h.quantity;
                out.total_value += value;
                out.positions.push(Position {
                    card_id: r.card_id,
                    name: r.name.clone(),
                    set_code: r.set_code.clone(),
                    number: r.number.clone(),
                    quantity: h.quantity,
                    price: r.price,
                    date: r.date,
                    value,
                });
            }
            None => out.missing_card_ids.push(h.card_id),
        }
    }

    out
}
