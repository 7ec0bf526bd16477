//! Card lookups and search against the `card` table.

use crate::error::Result;
use crate::models::Card;
use crate::sql_builder::SqlBuilder;
use crate::store::PriceStore;

/// Default page size for [`CardQuery::search`].
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

// ---------------------------------------------------------------------------
// SearchCardsParams
// ---------------------------------------------------------------------------

/// Parameters for card search.
///
/// All fields are optional. When `None`, the corresponding filter is skipped.
#[derive(Debug, Clone, Default)]
pub struct SearchCardsParams {
    /// Case-insensitive substring of the card name.
    pub name: Option<String>,
    pub set_code: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

// ---------------------------------------------------------------------------
// CardQuery
// ---------------------------------------------------------------------------

/// Query interface for cards.
pub struct CardQuery<'a> {
    conn: &'a crate::connection::Connection,
}

impl<'a> CardQuery<'a> {
    /// Create a new `CardQuery` bound to the given connection.
    pub fn new(conn: &'a crate::connection::Connection) -> Self {
        Self { conn }
    }

    /// Retrieve a single card by id.
    pub fn get(&self, id: i64) -> Result<Option<Card>> {
        PriceStore::new(self.conn).card_by_id(id)
    }

    /// Search cards by name substring and/or set code, ordered by id.
    pub fn search(&self, params: &SearchCardsParams) -> Result<Vec<Card>> {
        let mut qb = SqlBuilder::new("card");
        qb.select(&["id", "name", "set_code", "number", "rarity"]);

        if let Some(ref name) = params.name {
            qb.where_contains("name", name.trim());
        }
        if let Some(ref set_code) = params.set_code {
            qb.where_eq("set_code", set_code);
        }

        qb.order_by(&["id ASC"]);
        qb.limit(params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT));
        if let Some(offset) = params.offset {
            qb.offset(offset);
        }

        let (sql, sql_params) = qb.build();
        self.conn.execute_into(&sql, &sql_params)
    }
}
