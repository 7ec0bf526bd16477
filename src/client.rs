//! Blocking HTTP client for the REST API.
//!
//! # Example
//!
//! ```no_run
//! use poke_pricer::client::PricerClient;
//! use poke_pricer::portfolio::HoldingRequest;
//!
//! let client = PricerClient::new("http://127.0.0.1:8001").unwrap();
//! println!("{:?}", client.health().unwrap());
//! let valuation = client
//!     .portfolio_value(&[HoldingRequest { card_id: 2, quantity: 3.0 }])
//!     .unwrap();
//! println!("{}", valuation.total_value);
//! ```

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{PricerError, Result};
use crate::models::{Card, CatalogSummary, PricePoint};
use crate::portfolio::{HoldingRequest, PortfolioValuation};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8001";

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
}

impl Health {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Serialize)]
struct PortfolioRequest<'a> {
    holdings: &'a [HoldingRequest],
}

/// Typed client for the pricer REST API.
pub struct PricerClient {
    base_url: String,
    http: Client,
}

impl PricerClient {
    /// Client with a 10 second timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(10))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("poke-pricer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn health(&self) -> Result<Health> {
        self.send(self.http.get(self.url("/health")))
    }

    pub fn catalog_summary(&self) -> Result<CatalogSummary> {
        self.send(self.http.get(self.url("/v1/catalog/summary")))
    }

    pub fn cards_search(&self, q: &str) -> Result<Vec<Card>> {
        self.send(self.http.get(self.url("/v1/cards/search")).query(&[("q", q)]))
    }

    pub fn card_detail(&self, card_id: i64) -> Result<Card> {
        self.send(self.http.get(self.url(&format!("/v1/cards/{card_id}"))))
    }

    pub fn card_prices(&self, card_id: i64, limit: Option<usize>) -> Result<Vec<PricePoint>> {
        let mut req = self.http.get(self.url(&format!("/v1/cards/{card_id}/prices")));
        if let Some(n) = limit {
            req = req.query(&[("limit", n)]);
        }
        self.send(req)
    }

    pub fn portfolio_value(&self, holdings: &[HoldingRequest]) -> Result<PortfolioValuation> {
        let body = PortfolioRequest { holdings };
        self.send(self.http.post(self.url("/v1/portfolio/value")).json(&body))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let resp = req.send()?;
        let status = resp.status();
        if status.as_u16() >= 400 {
            return Err(PricerError::Api {
                status: status.as_u16(),
                message: resp.text().unwrap_or_default(),
            });
        }
        Ok(resp.json()?)
    }
}
