use std::sync::Arc;

use anyhow::Context;
use poke_pricer::{logging, AsyncPricer, Settings};
use poke_pricer_api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();
    logging::init_logging(&settings.log_level)?;

    tracing::info!(db = %settings.db_path.display(), "opening price database");
    let pricer = AsyncPricer::builder()
        .db_path(&settings.db_path)
        .build()
        .await
        .context("failed to open price database")?;

    let app = router(Arc::new(AppState { pricer }));

    let listener = tokio::net::TcpListener::bind(&settings.api_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.api_addr))?;
    tracing::info!(addr = %settings.api_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
