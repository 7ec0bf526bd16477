//! Environment-driven settings.
//!
//! Every key is read from `POKEPRICER_<KEY>`, after loading a `.env` file
//! from the working directory when one exists.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_PREFIX: &str = "POKEPRICER_";
pub const DEFAULT_LOG_LEVEL: &str = "INFO";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DB_FILE_NAME: &str = "poke_pricer.duckdb";
pub const DEFAULT_API_ADDR: &str = "127.0.0.1:8001";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub debug: bool,
    pub log_level: String,
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub slack_webhook_url: Option<String>,
    pub api_addr: String,
    pub http_timeout_secs: u64,

    // Vendor credentials, unused until a live price source is wired in.
    pub tcgplayer_public_key: Option<String>,
    pub tcgplayer_private_key: Option<String>,
    pub ebay_app_id: Option<String>,
    pub psa_api_key: Option<String>,
    pub cgc_api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Settings {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any `full variable name -> value` lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(&format!("{ENV_PREFIX}{key}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let parse = |key: &str, default| parse_or(get(key), default);

        let data_dir = get("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let db_path = get("DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(DB_FILE_NAME));

        Self {
            debug: get("DEBUG").as_deref().map(parse_bool).unwrap_or(false),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            data_dir,
            db_path,
            slack_webhook_url: get("SLACK_WEBHOOK_URL"),
            api_addr: get("API_ADDR").unwrap_or_else(|| DEFAULT_API_ADDR.to_string()),
            http_timeout_secs: parse("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS),
            tcgplayer_public_key: get("TCGPLAYER_PUBLIC_KEY"),
            tcgplayer_private_key: get("TCGPLAYER_PRIVATE_KEY"),
            ebay_app_id: get("EBAY_APP_ID"),
            psa_api_key: get("PSA_API_KEY"),
            cgc_api_key: get("CGC_API_KEY"),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Settings as `(key, value)` pairs safe to print: secrets become `***`.
    pub fn public_view(&self) -> Vec<(&'static str, String)> {
        let mask = |v: &Option<String>| if v.is_some() { "***" } else { "" }.to_string();
        vec![
            ("debug", self.debug.to_string()),
            ("log_level", self.log_level.clone()),
            ("data_dir", self.data_dir.display().to_string()),
            ("db_path", self.db_path.display().to_string()),
            ("api_addr", self.api_addr.clone()),
            ("http_timeout_secs", self.http_timeout_secs.to_string()),
            ("slack_webhook_url", mask(&self.slack_webhook_url)),
            ("tcgplayer_public_key", mask(&self.tcgplayer_public_key)),
            ("tcgplayer_private_key", mask(&self.tcgplayer_private_key)),
            ("ebay_app_id", mask(&self.ebay_app_id)),
            ("psa_api_key", mask(&self.psa_api_key)),
            ("cgc_api_key", mask(&self.cgc_api_key)),
        ]
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn parse_bool(s: &str) -> bool {
    matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
