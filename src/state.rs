use std::sync::Arc;

use sqlx::SqlitePool;

use crate::services::providers::MetadataProvider;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub provider: Arc<dyn MetadataProvider>,
}

impl AppState {
    pub fn new(db: SqlitePool, provider: Arc<dyn MetadataProvider>) -> Self {
        Self { db, provider }
    }
}
