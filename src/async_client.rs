//! Async wrapper around [`Pricer`] for use in Tokio runtimes.
//!
//! Every operation runs on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//!
//! # Example
//!
//! ```no_run
//! use poke_pricer::AsyncPricer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pricer = AsyncPricer::builder()
//!         .db_path("data/poke_pricer.duckdb")
//!         .build()
//!         .await
//!         .unwrap();
//!     let summary = pricer.run(|p| p.catalog().summary()).await.unwrap();
//!     println!("{} prices", summary.total_prices);
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::analytics::{compute_top_movers, MoverRow};
use crate::error::{PricerError, Result};
use crate::models::{Card, CatalogSummary, PricePoint};
use crate::portfolio::{value_holdings, HoldingRequest, PortfolioValuation};
use crate::queries::SearchCardsParams;
use crate::Pricer;

// ---------------------------------------------------------------------------
// AsyncPricerBuilder
// ---------------------------------------------------------------------------

/// Builder for an [`AsyncPricer`].
#[derive(Default)]
pub struct AsyncPricerBuilder {
    db_path: Option<PathBuf>,
    in_memory: bool,
}

impl AsyncPricerBuilder {
    pub fn db_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.db_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    /// Open the database on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncPricer> {
        tokio::task::spawn_blocking(move || {
            let mut builder = Pricer::builder();
            if let Some(path) = self.db_path {
                builder = builder.db_path(path);
            }
            if self.in_memory {
                builder = builder.in_memory();
            }
            Ok(AsyncPricer::from_pricer(builder.build()?))
        })
        .await
        .map_err(|e| PricerError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncPricer
// ---------------------------------------------------------------------------

/// Shareable async handle. Clones refer to the same database connection,
/// which is guarded by a [`Mutex`].
#[derive(Clone)]
pub struct AsyncPricer {
    inner: Arc<Mutex<Pricer>>,
}

impl AsyncPricer {
    pub fn builder() -> AsyncPricerBuilder {
        AsyncPricerBuilder::default()
    }

    /// Wrap an already opened [`Pricer`].
    pub fn from_pricer(pricer: Pricer) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pricer)),
        }
    }

    /// Run a sync operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Pricer) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pricer = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = pricer
                .lock()
                .map_err(|_| PricerError::InvalidArgument("pricer lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| PricerError::InvalidArgument(format!("Task join error: {e}")))?
    }

    pub async fn catalog_summary(&self) -> Result<CatalogSummary> {
        self.run(|p| p.catalog().summary()).await
    }

    pub async fn top_movers(&self, k: usize, on_date: Option<NaiveDate>) -> Result<Vec<MoverRow>> {
        self.run(move |p| Ok(compute_top_movers(&p.load_price_table()?, k, on_date)))
            .await
    }

    pub async fn search_cards(&self, params: SearchCardsParams) -> Result<Vec<Card>> {
        self.run(move |p| p.cards().search(&params)).await
    }

    /// Fails with [`PricerError::NotFound`] for an unknown id.
    pub async fn card(&self, id: i64) -> Result<Card> {
        self.run(move |p| {
            p.cards()
                .get(id)?
                .ok_or_else(|| PricerError::NotFound(format!("card {id}")))
        })
        .await
    }

    /// Price history, newest first. Fails with [`PricerError::NotFound`]
    /// for an unknown card.
    pub async fn card_prices(&self, id: i64, limit: Option<usize>) -> Result<Vec<PricePoint>> {
        self.run(move |p| {
            if p.cards().get(id)?.is_none() {
                return Err(PricerError::NotFound(format!("card {id}")));
            }
            p.prices().for_card(id, limit)
        })
        .await
    }

    pub async fn value_holdings(
        &self,
        holdings: Vec<HoldingRequest>,
    ) -> Result<PortfolioValuation> {
        self.run(move |p| Ok(value_holdings(&p.load_price_table()?, &holdings)))
            .await
    }
}
