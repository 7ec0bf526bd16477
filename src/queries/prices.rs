//! Price point reads: per-card history and the denormalized price table.

use duckdb::params;

use crate::analytics::{PriceRecord, PriceTable};
use crate::error::Result;
use crate::models::PricePoint;

// ---------------------------------------------------------------------------
// PriceQuery
// ---------------------------------------------------------------------------

/// Query interface for price points.
pub struct PriceQuery<'a> {
    conn: &'a crate::connection::Connection,
}

impl<'a> PriceQuery<'a> {
    /// Create a new `PriceQuery` bound to the given connection.
    pub fn new(conn: &'a crate::connection::Connection) -> Self {
        Self { conn }
    }

    /// Price history for a card, newest first, optionally truncated.
    pub fn for_card(&self, card_id: i64, limit: Option<usize>) -> Result<Vec<PricePoint>> {
        let mut sql = String::from(
            "SELECT id, card_id, CAST(date AS VARCHAR) AS date, source, price \
             FROM price_point WHERE card_id = ? ORDER BY date DESC, source ASC",
        );
        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {}", n));
        }
        self.conn.execute_params_into(&sql, params![card_id])
    }

    /// Load every price point joined with its card, sorted by `(card_id, date)`.
    pub fn table(&self) -> Result<PriceTable> {
        let records: Vec<PriceRecord> = self.conn.execute_into(
            r#"
            SELECT
                p.card_id,
                c.name,
                c.set_code,
                c.number,
                CAST(p.date AS VARCHAR) AS date,
                p.source,
                p.price
            FROM price_point p
            JOIN card c ON c.id = p.card_id
            ORDER BY p.card_id ASC, p.date ASC, p.source ASC
            "#,
            &[],
        )?;
        Ok(PriceTable::from_sorted(records))
    }
}
