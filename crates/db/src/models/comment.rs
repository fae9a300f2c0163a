//! Wiki page comment models and DTOs.

use biowiki_core::comment::{CommentStatus, CommentType, IssueKind};
use biowiki_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `page_comments` table.
///
/// `status`, `comment_type`, and `issue` hold the `as_str()` form of the
/// corresponding enums in `biowiki_core::comment`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PageComment {
    pub id: DbId,
    pub page_id: DbId,
    pub status: String,
    pub comment_type: String,
    pub issue: Option<String>,
    pub detail: String,
    pub init_revision_id: Option<DbId>,
    pub final_revision_id: Option<DbId>,
    pub author_id: DbId,
    pub created_at: Timestamp,
    pub modified_at: Timestamp,
}

/// DTO for opening a comment on a page.
#[derive(Debug, Deserialize)]
pub struct CreatePageComment {
    #[serde(default)]
    pub comment_type: CommentType,
    pub issue: Option<IssueKind>,
    #[serde(default)]
    pub detail: String,
}

/// DTO for moving a comment to another status.
#[derive(Debug, Deserialize)]
pub struct UpdateCommentStatus {
    pub status: CommentStatus,
}
