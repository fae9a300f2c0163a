//! Pagination defaults and substring-search helpers.

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Maximum page size for list endpoints.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Default number of tag suggestions.
pub const DEFAULT_SUGGEST_LIMIT: i64 = 10;

/// Maximum number of tag suggestions.
pub const MAX_SUGGEST_LIMIT: i64 = 50;

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Build a `LIKE` pattern matching any value containing `needle` literally.
///
/// `%`, `_` and `\` in the input are escaped (PostgreSQL's default escape
/// character is `\`).
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
