//! View counting with per-viewer deduplication.
//!
//! A view is counted unless the same viewer already viewed the same post
//! within the dedup window. Viewers are identified by user id when signed in,
//! otherwise by client address. Requests with no identifiable viewer always
//! count.

use crate::types::{DbId, Timestamp};

/// Default dedup window: 30 minutes.
pub const DEFAULT_DEDUP_WINDOW_SECS: i64 = 30 * 60;

/// Derive the key a view is deduplicated on.
///
/// `forwarded_for` is the raw `X-Forwarded-For` header; only its first
/// (client) address is used.
pub fn viewer_key(user_id: Option<DbId>, forwarded_for: Option<&str>) -> Option<String> {
    if let Some(id) = user_id {
        return Some(format!("user:{id}"));
    }
    forwarded_for
        .and_then(|header| header.split(',').next())
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
        .map(|addr| format!("ip:{addr}"))
}

/// Whether a view at `now` repeats one recorded at `last_view` within the window.
pub fn is_duplicate_view(last_view: Option<Timestamp>, now: Timestamp, window_secs: i64) -> bool {
    match last_view {
        Some(last) if window_secs > 0 => (now - last).num_seconds() < window_secs,
        _ => false,
    }
}
