use std::sync::Arc;

use crate::config::ServerConfig;
use crate::engine::BulkJobEngine;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: compass_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Bulk membership job engine (registry, executor launch, shutdown drain).
    pub engine: Arc<BulkJobEngine>,
}
