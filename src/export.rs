//! CSV output with fixed headers.
//!
//! Every output table declares its column list up front, so a result with
//! zero rows still produces a file whose header matches a populated one.

use std::fs::{self, File};
use std::path::Path;

use serde::Serialize;

use crate::analytics::PriceTable;
use crate::error::Result;
use crate::models::CatalogSummary;

/// A row type with a fixed, ordered column list.
///
/// The serialized field order must match [`CsvRow::COLUMNS`].
pub trait CsvRow: Serialize {
    const COLUMNS: &'static [&'static str];
}

impl CsvRow for CatalogSummary {
    const COLUMNS: &'static [&'static str] =
        &["total_cards", "total_prices", "min_date", "max_date", "sources"];
}

fn create(path: &Path) -> Result<csv::Writer<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?)
}

/// Write typed rows under their fixed header. Returns the number of rows.
pub fn write_rows<R: CsvRow>(path: &Path, rows: &[R]) -> Result<usize> {
    let mut wtr = create(path)?;
    wtr.write_record(R::COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(rows.len())
}

/// Write pre-rendered string records under a caller-provided header.
pub fn write_records<I>(path: &Path, header: &[String], records: I) -> Result<usize>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut wtr = create(path)?;
    wtr.write_record(header)?;
    let mut n = 0;
    for record in records {
        wtr.write_record(&record)?;
        n += 1;
    }
    wtr.flush()?;
    Ok(n)
}

// ---------------------------------------------------------------------------
// Price export
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
struct ExportRow<'a> {
    card_id: i64,
    name: &'a str,
    set_code: &'a str,
    number: &'a str,
    date: String,
    source: &'a str,
    price: String,
}

impl CsvRow for ExportRow<'_> {
    const COLUMNS: &'static [&'static str] =
        &["card_id", "name", "set_code", "number", "date", "source", "price"];
}

/// Export every joined price row, prices rendered with two decimals.
pub fn export_prices_csv(table: &PriceTable, path: &Path) -> Result<usize> {
    let rows: Vec<ExportRow<'_>> = table
        .records()
        .iter()
        .map(|r| ExportRow {
            card_id: r.card_id,
            name: &r.name,
            set_code: &r.set_code,
            number: &r.number,
            date: r.date.format("%Y-%m-%d").to_string(),
            source: &r.source,
            price: format!("{:.2}", r.price),
        })
        .collect();
    write_rows(path, &rows)
}

/// Render an optional float as a CSV cell (blank when undefined).
pub(crate) fn opt_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
