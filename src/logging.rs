//! Tracing subscriber setup shared by the CLI and the API server.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{PricerError, Result};

/// Install a formatted subscriber writing to stderr.
///
/// `RUST_LOG` wins when set; otherwise `level` (e.g. `INFO`, `debug`,
/// `poke_pricer=trace`) is used. Fails if a subscriber is already installed.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.to_ascii_lowercase()))
        .map_err(|e| PricerError::InvalidArgument(format!("invalid log level {level:?}: {e}")))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| PricerError::InvalidArgument(format!("logging already initialized: {e}")))?;

    tracing::debug!(level, "logging initialized");
    Ok(())
}
