use biowiki_core::search::DEFAULT_SUGGEST_LIMIT;
use biowiki_core::views::DEFAULT_DEDUP_WINDOW_SECS;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the JWT
/// secret and database URL, which must be provided.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Whether tag suggestions match case-sensitively (default: `false`).
    pub tag_search_case_sensitive: bool,
    /// Default number of tag suggestions per page (default: `10`).
    pub tag_suggest_limit: i64,
    /// Window within which repeat views by one viewer count once (default: `1800`).
    pub view_dedup_window_secs: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `3000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `TAG_SEARCH_CASE_SENSITIVE` | `false`                 |
    /// | `TAG_SUGGEST_LIMIT`         | `10`                    |
    /// | `VIEW_DEDUP_WINDOW_SECS`    | `1800`                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let tag_search_case_sensitive: bool = std::env::var("TAG_SEARCH_CASE_SENSITIVE")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("TAG_SEARCH_CASE_SENSITIVE must be true or false");

        let tag_suggest_limit: i64 = std::env::var("TAG_SUGGEST_LIMIT")
            .unwrap_or_else(|_| DEFAULT_SUGGEST_LIMIT.to_string())
            .parse()
            .expect("TAG_SUGGEST_LIMIT must be a valid i64");

        let view_dedup_window_secs: i64 = std::env::var("VIEW_DEDUP_WINDOW_SECS")
            .unwrap_or_else(|_| DEFAULT_DEDUP_WINDOW_SECS.to_string())
            .parse()
            .expect("VIEW_DEDUP_WINDOW_SECS must be a valid i64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            tag_search_case_sensitive,
            tag_suggest_limit,
            view_dedup_window_secs,
        }
    }
}
