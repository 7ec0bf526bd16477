//! Data quality checks: duplicate observations and cards that stopped
//! receiving prices.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analytics::{PriceRecord, PriceTable};
use crate::error::Result;
use crate::export::{write_rows, CsvRow};
use crate::Pricer;

pub const DEFAULT_STALE_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateRow {
    pub card_id: i64,
    pub name: String,
    pub set_code: String,
    pub number: String,
    pub source: String,
    pub date: NaiveDate,
    pub count: usize,
}

impl CsvRow for DuplicateRow {
    const COLUMNS: &'static [&'static str] =
        &["card_id", "name", "set_code", "number", "source", "date", "count"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaleCardRow {
    pub card_id: i64,
    pub name: String,
    pub set_code: String,
    pub number: String,
    pub last_date: NaiveDate,
    pub age_days: i64,
}

impl CsvRow for StaleCardRow {
    const COLUMNS: &'static [&'static str] =
        &["card_id", "name", "set_code", "number", "last_date", "age_days"];
}

/// Groups of rows sharing `(card_id, date, source)`, ordered by that key.
///
/// The store's uniqueness constraint keeps this empty for data it loaded.
pub fn find_duplicates(table: &PriceTable) -> Vec<DuplicateRow> {
    let mut groups: BTreeMap<(i64, NaiveDate, &str), (usize, &PriceRecord)> = BTreeMap::new();
    for r in table.records() {
        groups
            .entry((r.card_id, r.date, r.source.as_str()))
            .and_modify(|g| g.0 += 1)
            .or_insert((1, r));
    }

    groups
        .into_values()
        .filter(|(count, _)| *count > 1)
        .map(|(count, r)| DuplicateRow {
            card_id: r.card_id,
            name: r.name.clone(),
            set_code: r.set_code.clone(),
            number: r.number.clone(),
            source: r.source.clone(),
            date: r.date,
            count,
        })
        .collect()
}

/// Cards whose latest observation is more than `days` before the dataset's
/// own latest date, oldest first.
pub fn find_stale_cards(table: &PriceTable, days: i64) -> Vec<StaleCardRow> {
    let Some(max_date) = table.max_date() else {
        return Vec::new();
    };

    let mut stale: Vec<StaleCardRow> = table
        .by_card()
        .filter_map(|rows| {
            let first = rows.first()?;
            let last_date = rows.iter().map(|r| r.date).max()?;
            let age_days = (max_date - last_date).num_days();
            (age_days > days).then(|| StaleCardRow {
                card_id: first.card_id,
                name: first.name.clone(),
                set_code: first.set_code.clone(),
                number: first.number.clone(),
                last_date,
                age_days,
            })
        })
        .collect();

    stale.sort_by(|a, b| b.age_days.cmp(&a.age_days));
    stale
}

/// Write `qa_summary.csv`, `qa_duplicates.csv` and `qa_stale_cards.csv`.
pub fn write_qa_bundle(pricer: &Pricer, out_dir: &Path, stale_days: i64) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;

    let summary = pricer.catalog().summary()?;
    let table = pricer.load_price_table()?;

    let summary_path = out_dir.join("qa_summary.csv");
    let dups_path = out_dir.join("qa_duplicates.csv");
    let stale_path = out_dir.join("qa_stale_cards.csv");

    write_rows(&summary_path, &[summary])?;
    let dups = write_rows(&dups_path, &find_duplicates(&table))?;
    let stale = write_rows(&stale_path, &find_stale_cards(&table, stale_days))?;

    info!(dir = %out_dir.display(), dups, stale, "qa bundle written");
    Ok(vec![summary_path, dups_path, stale_path])
}
