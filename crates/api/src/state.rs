use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference-counted and the config sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: biowiki_db::DbPool,
    /// Server configuration (JWT secret, search and view settings).
    pub config: Arc<ServerConfig>,
}
