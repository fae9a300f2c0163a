//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the handlers via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters selecting a listing tab (`?tab=&limit=&offset=`).
#[derive(Debug, Deserialize)]
pub struct TabParams {
    pub tab: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
