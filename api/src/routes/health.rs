use axum::response::Json;
use poke_pricer::client::Health;

/// GET /health
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}
