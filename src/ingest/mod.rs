//! CSV ingestion into the price store.
//!
//! Rows are validated into [`PriceRow`]s at the boundary. Invalid rows and
//! duplicate observations are counted as skipped; neither aborts a batch, so
//! re-ingesting the same file is a no-op.

pub mod schema;

pub use schema::{HeaderMap, PriceRow, RowError, DEFAULT_SOURCE, REQUIRED_COLUMNS};

use std::collections::HashMap;
use std::fs::{self, File};
use std::ops::AddAssign;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{PricerError, Result};
use crate::models::CardKey;
use crate::Pricer;

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Aggregate outcome of an ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    pub cards_created: usize,
    pub prices_inserted: usize,
    /// Invalid rows plus rows that already existed.
    pub prices_skipped: usize,
}

impl IngestSummary {
    pub fn log_summary(&self, operation: &str) {
        info!(
            operation = operation,
            cards_created = self.cards_created,
            prices_inserted = self.prices_inserted,
            prices_skipped = self.prices_skipped,
            "ingest finished"
        );
    }
}

impl AddAssign for IngestSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.cards_created += rhs.cards_created;
        self.prices_inserted += rhs.prices_inserted;
        self.prices_skipped += rhs.prices_skipped;
    }
}

/// Parse-only report produced by [`validate_csv`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub rows: usize,
    pub valid: usize,
    pub invalid: usize,
    pub errors: Vec<RowError>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.invalid == 0
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

fn open_price_csv(path: &Path) -> Result<(csv::Reader<File>, HeaderMap)> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    // an unreadable header (binary or non-UTF-8 export) is not a price file
    let headers = match rdr.headers() {
        Ok(h) => h.clone(),
        Err(e) if e.is_io_error() => return Err(e.into()),
        Err(e) => {
            return Err(PricerError::InvalidArgument(format!(
                "{}: unreadable CSV header: {e}",
                path.display()
            )))
        }
    };
    let map = HeaderMap::from_headers(&headers, &REQUIRED_COLUMNS).map_err(|e| match e {
        PricerError::InvalidArgument(msg) => {
            PricerError::InvalidArgument(format!("{}: {msg}", path.display()))
        }
        other => other,
    })?;
    Ok((rdr, map))
}

/// Parse every record of a price CSV, yielding one result per data row.
fn parse_rows(
    path: &Path,
    default_source: &str,
) -> Result<Vec<std::result::Result<PriceRow, RowError>>> {
    let (mut rdr, headers) = open_price_csv(path)?;
    let mut out = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        // header is line 1
        let line = i as u64 + 2;
        let parsed = match record {
            Ok(rec) => PriceRow::parse(&headers, &rec, line, default_source),
            Err(e) => Err(RowError {
                line,
                message: e.to_string(),
            }),
        };
        out.push(parsed);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

/// Ingest one price CSV.
///
/// Fails with [`PricerError::InvalidArgument`] when a required column is
/// missing from the header; bad rows only count as skipped.
pub fn ingest_csv(pricer: &Pricer, path: &Path, default_source: &str) -> Result<IngestSummary> {
    let rows = parse_rows(path, default_source)?;

    let mut invalid = 0;
    let valid = rows.into_iter().filter_map(|r| match r {
        Ok(row) => Some(row),
        Err(e) => {
            debug!(file = %path.display(), error = %e, "skipping invalid row");
            invalid += 1;
            None
        }
    });
    let mut summary = ingest_rows(pricer, valid)?;
    summary.prices_skipped += invalid;

    debug!(file = %path.display(), ?summary, "ingested csv");
    Ok(summary)
}

/// Ingest every `*.csv` file directly inside `dir`, in file name order.
///
/// Files whose header is unreadable or lacks a required column are not price
/// files and are skipped with a warning.
pub fn ingest_dir(pricer: &Pricer, dir: &Path, default_source: &str) -> Result<IngestSummary> {
    let mut total = IngestSummary::default();
    for path in csv_files(dir)? {
        match ingest_csv(pricer, &path, default_source) {
            Ok(summary) => total += summary,
            Err(PricerError::InvalidArgument(msg)) => {
                warn!(file = %path.display(), reason = %msg, "skipping non-price csv");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

/// Write already-validated rows to the store.
pub fn ingest_rows<I>(pricer: &Pricer, rows: I) -> Result<IngestSummary>
where
    I: IntoIterator<Item = PriceRow>,
{
    let store = pricer.store();
    let mut summary = IngestSummary::default();
    let mut card_cache: HashMap<CardKey, i64> = HashMap::new();

    for row in rows {
        let card_id = match card_cache.get(&row.key()) {
            Some(id) => *id,
            None => {
                let (card, created) = store.find_or_create_card(
                    &row.name,
                    &row.set_code,
                    &row.number,
                    row.rarity.as_deref(),
                )?;
                if created {
                    summary.cards_created += 1;
                }
                card_cache.insert(row.key(), card.id);
                card.id
            }
        };

        if store.insert_price_if_absent(card_id, row.date, &row.source, row.price)? {
            summary.prices_inserted += 1;
        } else {
            summary.prices_skipped += 1;
        }
    }

    Ok(summary)
}

/// Validate a price CSV without touching the store.
pub fn validate_csv(path: &Path) -> Result<ValidationReport> {
    let mut report = ValidationReport::default();
    for parsed in parse_rows(path, DEFAULT_SOURCE)? {
        report.rows += 1;
        match parsed {
            Ok(_) => report.valid += 1,
            Err(e) => {
                report.invalid += 1;
                report.errors.push(e);
            }
        }
    }
    Ok(report)
}

fn csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
