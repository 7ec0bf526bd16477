//! Relational price store: the `card` and `price_point` tables.
//!
//! Cards are unique on `(set_code, number)` and price points on
//! `(card_id, date, source)`. Writes never update an existing price point;
//! a duplicate observation is simply not inserted.

use chrono::NaiveDate;
use duckdb::params;
use tracing::debug;

use crate::connection::Connection;
use crate::error::Result;
use crate::models::Card;

const SCHEMA_SQL: &str = r#"
CREATE SEQUENCE IF NOT EXISTS card_id_seq START 1;
CREATE SEQUENCE IF NOT EXISTS price_point_id_seq START 1;
CREATE TABLE IF NOT EXISTS card (
    id BIGINT PRIMARY KEY DEFAULT nextval('card_id_seq'),
    name VARCHAR NOT NULL,
    set_code VARCHAR NOT NULL,
    number VARCHAR NOT NULL,
    rarity VARCHAR,
    UNIQUE (set_code, number)
);
CREATE TABLE IF NOT EXISTS price_point (
    id BIGINT PRIMARY KEY DEFAULT nextval('price_point_id_seq'),
    card_id BIGINT NOT NULL REFERENCES card (id),
    date DATE NOT NULL,
    source VARCHAR NOT NULL,
    price DOUBLE NOT NULL,
    UNIQUE (card_id, date, source)
);
"#;

const CARD_COLUMNS: &str = "id, name, set_code, number, rarity";

// ---------------------------------------------------------------------------
// PriceStore
// ---------------------------------------------------------------------------

/// Write-side access to the price database.
pub struct PriceStore<'a> {
    conn: &'a Connection,
}

impl<'a> PriceStore<'a> {
    /// Create a new `PriceStore` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create the tables and sequences if they do not exist yet.
    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA_SQL)?;
        debug!(path = ?self.conn.path, "price store schema ready");
        Ok(())
    }

    /// Look up a card by its `(set_code, number)` identity.
    pub fn find_card(&self, set_code: &str, number: &str) -> Result<Option<Card>> {
        let sql = format!("SELECT {CARD_COLUMNS} FROM card WHERE set_code = ? AND number = ?");
        let cards: Vec<Card> = self
            .conn
            .execute_params_into(&sql, params![set_code, number])?;
        Ok(cards.into_iter().next())
    }

    /// Look up a card by primary key.
    pub fn card_by_id(&self, id: i64) -> Result<Option<Card>> {
        let sql = format!("SELECT {CARD_COLUMNS} FROM card WHERE id = ?");
        let cards: Vec<Card> = self.conn.execute_params_into(&sql, params![id])?;
        Ok(cards.into_iter().next())
    }

    /// Return the card for `(set_code, number)`, creating it when absent.
    ///
    /// An existing card keeps its name; its rarity is only filled in when it
    /// was previously unknown.
    pub fn upsert_card(
        &self,
        name: &str,
        set_code: &str,
        number: &str,
        rarity: Option<&str>,
    ) -> Result<Card> {
        self.find_or_create_card(name, set_code, number, rarity)
            .map(|(card, _)| card)
    }

    /// Like [`upsert_card`](Self::upsert_card), also reporting whether a new
    /// row was inserted.
    pub fn find_or_create_card(
        &self,
        name: &str,
        set_code: &str,
        number: &str,
        rarity: Option<&str>,
    ) -> Result<(Card, bool)> {
        if let Some(mut card) = self.find_card(set_code, number)? {
            if let (None, Some(r)) = (&card.rarity, rarity) {
                self.conn.execute_update(
                    "UPDATE card SET rarity = ? WHERE id = ?",
                    params![r, card.id],
                )?;
                card.rarity = Some(r.to_string());
            }
            return Ok((card, false));
        }

        let id: i64 = self.conn.raw().query_row(
            "INSERT INTO card (name, set_code, number, rarity) VALUES (?, ?, ?, ?) RETURNING id",
            params![name, set_code, number, rarity],
            |row| row.get(0),
        )?;
        debug!(id, name, set_code, number, "created card");

        let card = Card {
            id,
            name: name.to_string(),
            set_code: set_code.to_string(),
            number: number.to_string(),
            rarity: rarity.map(str::to_string),
        };
        Ok((card, true))
    }

    /// Insert a price point unless `(card_id, date, source)` already exists.
    ///
    /// Returns `true` when a row was written.
    pub fn insert_price_if_absent(
        &self,
        card_id: i64,
        date: NaiveDate,
        source: &str,
        price: f64,
    ) -> Result<bool> {
        let written = self.conn.execute_update(
            "INSERT INTO price_point (card_id, date, source, price) \
             VALUES (?, CAST(? AS DATE), ?, ?) ON CONFLICT DO NOTHING",
            params![card_id, date.format("%Y-%m-%d").to_string(), source, price],
        )?;
        Ok(written > 0)
    }

    /// Number of rows in the `card` table.
    pub fn count_cards(&self) -> Result<i64> {
        self.count("SELECT COUNT(*) FROM card")
    }

    /// Number of rows in the `price_point` table.
    pub fn count_prices(&self) -> Result<i64> {
        self.count("SELECT COUNT(*) FROM price_point")
    }

    fn count(&self, sql: &str) -> Result<i64> {
        Ok(self
            .conn
            .execute_scalar(sql, &[])?
            .and_then(|v| v.as_i64())
            .unwrap_or(0))
    }
}
