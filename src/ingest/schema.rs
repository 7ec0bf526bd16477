//! Typed validation of price CSV rows.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PricerError, Result};
use crate::models::CardKey;

/// Columns every price CSV must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = ["name", "set_code", "number", "date", "price"];

/// Source label used when neither the row nor the caller provides one.
pub const DEFAULT_SOURCE: &str = "csv";

// ---------------------------------------------------------------------------
// PriceRow
// ---------------------------------------------------------------------------

/// A validated price observation, ready to be written to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub name: String,
    pub set_code: String,
    pub number: String,
    pub date: NaiveDate,
    pub price: f64,
    pub source: String,
    pub rarity: Option<String>,
}

impl PriceRow {
    /// Validate one CSV record.
    ///
    /// `line` is the 1-based line number used in the error (the header is
    /// line 1).
    pub fn parse(
        headers: &HeaderMap,
        record: &csv::StringRecord,
        line: u64,
        default_source: &str,
    ) -> std::result::Result<Self, RowError> {
        let err = |message: String| RowError { line, message };
        let field = |name: &str| headers.get(record, name).unwrap_or("");

        let required = |name: &str| {
            let v = field(name);
            if v.is_empty() {
                Err(err(format!("missing {name}")))
            } else {
                Ok(v.to_string())
            }
        };

        let name = required("name")?;
        let set_code = required("set_code")?;
        let number = required("number")?;

        let date_text = field("date");
        let date = NaiveDate::parse_from_str(date_text, "%Y-%m-%d")
            .map_err(|_| err(format!("invalid date {date_text:?}, expected YYYY-MM-DD")))?;

        let price_text = field("price");
        let price: f64 = price_text
            .parse()
            .map_err(|_| err(format!("invalid price {price_text:?}")))?;
        if !price.is_finite() || price <= 0.0 {
            return Err(err(format!("price must be positive, got {price_text}")));
        }

        let source = match field("source") {
            "" => default_source.to_string(),
            s => s.to_string(),
        };
        let rarity = match field("rarity") {
            "" => None,
            r => Some(r.to_string()),
        };

        Ok(Self {
            name,
            set_code,
            number,
            date,
            price,
            source,
            rarity,
        })
    }

    pub fn key(&self) -> CardKey {
        CardKey::new(&self.name, &self.set_code, &self.number)
    }
}

/// Why a row was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub line: u64,
    pub message: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

// ---------------------------------------------------------------------------
// HeaderMap
// ---------------------------------------------------------------------------

/// Column name to index mapping for a CSV header (names lower-cased).
#[derive(Debug, Clone)]
pub struct HeaderMap {
    idx: HashMap<String, usize>,
}

impl HeaderMap {
    /// Map `headers`, failing when any of `required` is absent.
    pub fn from_headers(headers: &csv::StringRecord, required: &[&str]) -> Result<Self> {
        let mut idx = HashMap::new();
        for (i, h) in headers.iter().enumerate() {
            idx.entry(h.trim().to_ascii_lowercase()).or_insert(i);
        }

        let mut missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|c| !idx.contains_key(*c))
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            let mut have: Vec<&str> = idx.keys().map(String::as_str).collect();
            have.sort_unstable();
            return Err(PricerError::InvalidArgument(format!(
                "CSV missing required columns: {missing:?} (have: {have:?})"
            )));
        }

        Ok(Self { idx })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.idx.contains_key(name)
    }

    /// Trimmed field value, or `None` when the column or the field is absent.
    pub fn get<'r>(&self, record: &'r csv::StringRecord, name: &str) -> Option<&'r str> {
        let i = *self.idx.get(name)?;
        record.get(i).map(str::trim)
    }
}
