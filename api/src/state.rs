/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// Dispatches blocking database work to the Tokio blocking pool.
    pub pricer: poke_pricer::AsyncPricer,
}
