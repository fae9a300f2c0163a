//! Q&A main post models and DTOs.

use biowiki_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::reply_post::ReplyWithRevision;
use crate::models::revision::Revision;
use crate::models::tag::TagInfo;

/// A row from the `main_posts` table.
///
/// `vote_count`, `reply_count`, and `view_count` are cached aggregates
/// maintained by the vote, reply, and view operations.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MainPost {
    pub id: DbId,
    pub title: String,
    pub author_id: DbId,
    pub current_revision_id: Option<DbId>,
    pub vote_count: i32,
    pub reply_count: i32,
    pub view_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for asking a new question.
#[derive(Debug, Deserialize)]
pub struct CreateMainPost {
    pub title: String,
    pub content: String,
    pub tags: Option<Vec<String>>,
}

/// DTO for editing a question.
#[derive(Debug, Deserialize)]
pub struct UpdateMainPost {
    pub content: String,
    pub summary: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Full post view: the question, its current text, tags, and replies.
#[derive(Debug, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: MainPost,
    pub current_revision: Option<Revision>,
    pub tags: Vec<TagInfo>,
    pub replies: Vec<ReplyWithRevision>,
}
