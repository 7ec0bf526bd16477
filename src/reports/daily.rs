use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analytics::{compute_top_movers, PriceTable};
use crate::error::Result;
use crate::export::{write_rows, CsvRow};
use crate::Pricer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub card_id: i64,
    pub name: String,
    pub set_code: String,
    pub number: String,
    pub source: String,
    pub price: f64,
    pub date: NaiveDate,
}

impl CsvRow for SnapshotRow {
    const COLUMNS: &'static [&'static str] =
        &["card_id", "name", "set_code", "number", "source", "price", "date"];
}

/// Every row observed on the dataset's latest date.
pub fn latest_snapshot(table: &PriceTable) -> Vec<SnapshotRow> {
    let Some(day) = table.max_date() else {
        return Vec::new();
    };
    table
        .records()
        .iter()
        .filter(|r| r.date == day)
        .map(|r| SnapshotRow {
            card_id: r.card_id,
            name: r.name.clone(),
            set_code: r.set_code.clone(),
            number: r.number.clone(),
            source: r.source.clone(),
            price: r.price,
            date: r.date,
        })
        .collect()
}

/// Write `catalog_summary.csv`, `top_movers.csv` and `latest_prices.csv`
/// into `out_dir`, returning the written paths in that order.
pub fn write_daily_reports(
    pricer: &Pricer,
    out_dir: &Path,
    k: usize,
    on_date: Option<NaiveDate>,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;

    let summary = pricer.catalog().summary()?;
    let table = pricer.load_price_table()?;

    let summary_path = out_dir.join("catalog_summary.csv");
    write_rows(&summary_path, &[summary])?;

    let movers_path = out_dir.join("top_movers.csv");
    let movers = write_rows(&movers_path, &compute_top_movers(&table, k, on_date))?;

    let latest_path = out_dir.join("latest_prices.csv");
    let latest = write_rows(&latest_path, &latest_snapshot(&table))?;

    info!(dir = %out_dir.display(), movers, latest, "daily reports written");
    Ok(vec![summary_path, movers_path, latest_path])
}
