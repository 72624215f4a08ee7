use std::sync::Arc;

use sqlx::PgPool;

use crate::store::MatchStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pool used by the profile and company directory CRUD.
    pub db: PgPool,
    /// Matching-layer storage. Default: `PgMatchStore` over the same pool.
    pub store: Arc<dyn MatchStore>,
}
