//! Dataset-level summary of the price store.

use crate::error::Result;
use crate::models::CatalogSummary;

/// Query interface for catalog statistics.
pub struct CatalogQuery<'a> {
    conn: &'a crate::connection::Connection,
}

impl<'a> CatalogQuery<'a> {
    /// Create a new `CatalogQuery` bound to the given connection.
    pub fn new(conn: &'a crate::connection::Connection) -> Self {
        Self { conn }
    }

    /// Counts, date range and sources; zeros and blanks for an empty store.
    pub fn summary(&self) -> Result<CatalogSummary> {
        let rows = self.conn.execute(
            r#"
            SELECT
                COUNT(*) AS total_prices,
                COUNT(DISTINCT card_id) AS total_cards,
                CAST(MIN(date) AS VARCHAR) AS min_date,
                CAST(MAX(date) AS VARCHAR) AS max_date
            FROM price_point
            "#,
            &[],
        )?;

        let mut summary = CatalogSummary::default();
        if let Some(row) = rows.into_iter().next() {
            let text = |key: &str| {
                row.get(key)
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string()
            };
            summary.total_prices = row.get("total_prices").and_then(|v| v.as_i64()).unwrap_or(0);
            summary.total_cards = row.get("total_cards").and_then(|v| v.as_i64()).unwrap_or(0);
            summary.min_date = text("min_date");
            summary.max_date = text("max_date");
        }

        let sources = self.conn.execute(
            "SELECT DISTINCT source FROM price_point WHERE source <> '' ORDER BY source",
            &[],
        )?;
        summary.sources = sources
            .iter()
            .filter_map(|r| r.get("source").and_then(|v| v.as_str()))
            .collect::<Vec<_>>()
            .join(",");

        Ok(summary)
    }
}
