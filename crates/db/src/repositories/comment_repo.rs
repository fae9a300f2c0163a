//! Repository for the `page_comments` table.

use biowiki_core::comment::{CommentStatus, CommentType, FinalRevisionChange, IssueKind};
use biowiki_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::PageComment;

/// Column list for `page_comments` queries.
const COLUMNS: &str = "\
    id, page_id, status, comment_type, issue, detail, init_revision_id, \
    final_revision_id, author_id, created_at, modified_at";

/// Provides CRUD and status transitions for wiki page comments.
pub struct PageCommentRepo;

impl PageCommentRepo {
    /// Create a comment anchored at the page's current revision.
    pub async fn create(
        pool: &PgPool,
        page_id: DbId,
        author_id: DbId,
        comment_type: CommentType,
        issue: Option<IssueKind>,
        detail: &str,
    ) -> Result<PageComment, sqlx::Error> {
        let query = format!(
            "INSERT INTO page_comments \
                (page_id, comment_type, issue, detail, author_id, init_revision_id) \
             VALUES ($1, $2, $3, $4, $5, \
                (SELECT current_revision_id FROM pages WHERE id = $1)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageComment>(&query)
            .bind(page_id)
            .bind(comment_type.as_str())
            .bind(issue.map(|i| i.as_str()))
            .bind(detail)
            .bind(author_id)
            .fetch_one(pool)
            .await
    }

    /// Find a comment belonging to `page_id`.
    pub async fn find(
        pool: &PgPool,
        page_id: DbId,
        id: DbId,
    ) -> Result<Option<PageComment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM page_comments WHERE id = $1 AND page_id = $2");
        sqlx::query_as::<_, PageComment>(&query)
            .bind(id)
            .bind(page_id)
            .fetch_optional(pool)
            .await
    }

    /// Comments on a page, newest first.
    pub async fn list_by_page(
        pool: &PgPool,
        page_id: DbId,
    ) -> Result<Vec<PageComment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM page_comments \
             WHERE page_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, PageComment>(&query)
            .bind(page_id)
            .fetch_all(pool)
            .await
    }

    /// Move a comment from `from` to `to`, applying `change` to `final_revision_id`.
    ///
    /// The update only applies while the stored status still equals `from`;
    /// `None` means the comment changed concurrently (or does not exist).
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        from: CommentStatus,
        to: CommentStatus,
        change: FinalRevisionChange,
    ) -> Result<Option<PageComment>, sqlx::Error> {
        let final_revision = match change {
            FinalRevisionChange::SetToCurrent => {
                "(SELECT current_revision_id FROM pages WHERE pages.id = page_comments.page_id)"
            }
            FinalRevisionChange::Clear => "NULL",
            FinalRevisionChange::Keep => "final_revision_id",
        };
        let query = format!(
            "UPDATE page_comments SET \
                status = $3, \
                final_revision_id = {final_revision}, \
                modified_at = NOW() \
             WHERE id = $1 AND status = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageComment>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(pool)
            .await
    }
}
