//! Vote models and DTOs.

use biowiki_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `votes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Vote {
    pub id: DbId,
    pub voter_id: DbId,
    pub content_type: String,
    pub object_id: DbId,
    pub choice: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for casting or changing a vote.
#[derive(Debug, Deserialize)]
pub struct CastVote {
    pub choice: i16,
}

/// Net vote count after a vote was cast.
#[derive(Debug, Serialize)]
pub struct VoteSummary {
    pub content_type: String,
    pub object_id: DbId,
    pub vote_count: i64,
    pub your_choice: i16,
}
