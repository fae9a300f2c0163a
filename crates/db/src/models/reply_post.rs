//! Reply post models and DTOs.

use biowiki_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::revision::Revision;

/// A row from the `reply_posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReplyPost {
    pub id: DbId,
    pub main_post_id: DbId,
    pub author_id: DbId,
    pub current_revision_id: Option<DbId>,
    pub vote_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for replying to a main post.
#[derive(Debug, Deserialize)]
pub struct CreateReplyPost {
    pub content: String,
}

/// DTO for editing a reply.
#[derive(Debug, Deserialize)]
pub struct UpdateReplyPost {
    pub content: String,
    pub summary: Option<String>,
}

/// A reply paired with the text of its current revision.
#[derive(Debug, Serialize)]
pub struct ReplyWithRevision {
    #[serde(flatten)]
    pub reply: ReplyPost,
    pub current_revision: Option<Revision>,
}
