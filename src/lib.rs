//! Trading-card price tracker.
//!
//! Ingests price observations from CSV files into a local DuckDB database
//! and derives analytics from them: returns and momentum, single-day and
//! windowed top movers, anomaly flags, a momentum backtest and portfolio
//! valuation.
//!
//! # Quick start
//!
//! ```no_run
//! use poke_pricer::Pricer;
//! use poke_pricer::analytics::compute_top_movers;
//!
//! let pricer = Pricer::builder().db_path("data/poke_pricer.duckdb").build().unwrap();
//! poke_pricer::ingest::ingest_csv(&pricer, "prices.csv".as_ref(), "csv").unwrap();
//!
//! let table = pricer.load_price_table().unwrap();
//! for row in compute_top_movers(&table, 5, None) {
//!     println!("{} {:+.2}%", row.name, row.return_1d * 100.0);
//! }
//! ```

pub mod analytics;
#[cfg(feature = "async")]
pub mod async_client;
pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod export;
pub mod ingest;
pub mod logging;
pub mod models;
pub mod notify;
pub mod portfolio;
pub mod queries;
pub mod reports;
pub mod seed;
pub mod sql_builder;
pub mod store;

#[cfg(feature = "async")]
pub use async_client::AsyncPricer;
pub use config::Settings;
pub use connection::Connection;
pub use error::{PricerError, Result};
pub use sql_builder::SqlBuilder;

use std::fmt;
use std::path::{Path, PathBuf};

use analytics::PriceTable;

// ---------------------------------------------------------------------------
// PricerBuilder
// ---------------------------------------------------------------------------

/// Builder for a [`Pricer`].
///
/// Without a database path the builder falls back to the configured default
/// (`data/poke_pricer.duckdb`).
#[derive(Debug, Clone, Default)]
pub struct PricerBuilder {
    db_path: Option<PathBuf>,
    in_memory: bool,
}

impl PricerBuilder {
    /// Use a database file, creating it and its parent directories if needed.
    pub fn db_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.db_path = Some(path.as_ref().to_path_buf());
        self.in_memory = false;
        self
    }

    /// Use a throwaway in-memory database.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    /// Take the database path from [`Settings`].
    pub fn settings(self, settings: &Settings) -> Self {
        self.db_path(&settings.db_path)
    }

    /// Open the database and make sure the schema exists.
    pub fn build(self) -> Result<Pricer> {
        let conn = if self.in_memory {
            Connection::open_in_memory()?
        } else {
            let path = self
                .db_path
                .unwrap_or_else(|| Settings::default().db_path);
            Connection::open(&path)?
        };
        let pricer = Pricer { conn };
        pricer.init()?;
        Ok(pricer)
    }
}

// ---------------------------------------------------------------------------
// Pricer
// ---------------------------------------------------------------------------

/// Handle to one price database.
///
/// Owns the [`Connection`] and hands out lightweight borrowing wrappers for
/// reads ([`cards`](Self::cards), [`prices`](Self::prices),
/// [`catalog`](Self::catalog)) and writes ([`store`](Self::store)).
pub struct Pricer {
    conn: Connection,
}

impl Pricer {
    pub fn builder() -> PricerBuilder {
        PricerBuilder::default()
    }

    /// Create tables if missing. Safe to call repeatedly.
    pub fn init(&self) -> Result<()> {
        self.store().init()
    }

    pub fn cards(&self) -> queries::CardQuery<'_> {
        queries::CardQuery::new(&self.conn)
    }

    pub fn prices(&self) -> queries::PriceQuery<'_> {
        queries::PriceQuery::new(&self.conn)
    }

    pub fn catalog(&self) -> queries::CatalogQuery<'_> {
        queries::CatalogQuery::new(&self.conn)
    }

    pub fn store(&self) -> store::PriceStore<'_> {
        store::PriceStore::new(&self.conn)
    }

    /// Snapshot of every price point joined with its card.
    pub fn load_price_table(&self) -> Result<PriceTable> {
        self.prices().table()
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl fmt::Display for Pricer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.conn.path {
            Some(path) => write!(f, "Pricer(db={})", path.display()),
            None => write!(f, "Pricer(db=:memory:)"),
        }
    }
}
