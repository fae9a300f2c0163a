//! Generic up/down votes attachable to any content type.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const UPVOTE: i16 = 1;
pub const DOWNVOTE: i16 = -1;

/// Content types that can receive votes. Stored in `votes.content_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteTarget {
    Page,
    MainPost,
    ReplyPost,
}

impl VoteTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::MainPost => "main_post",
            Self::ReplyPost => "reply_post",
        }
    }
}

impl std::fmt::Display for VoteTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vote choice must be exactly `+1` or `-1`.
pub fn validate_choice(choice: i16) -> Result<(), CoreError> {
    if choice == UPVOTE || choice == DOWNVOTE {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Vote choice must be {UPVOTE} or {DOWNVOTE}, got {choice}"
        )))
    }
}

/// Net vote count: upvotes minus downvotes.
pub fn tally(upvotes: i64, downvotes: i64) -> i64 {
    upvotes - downvotes
}
