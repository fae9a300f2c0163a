//! Repository for the `main_posts` and `post_views` tables.

use biowiki_core::posts::IndexTab;
use biowiki_core::types::{DbId, Timestamp};
use biowiki_core::views::is_duplicate_view;
use sqlx::PgPool;

use crate::models::main_post::MainPost;
use crate::models::revision::{MainPostHistory, NewRevision, Revision};
use crate::repositories::RevisionRepo;

/// Column list for `main_posts` queries.
pub(crate) const COLUMNS: &str = "\
    id, title, author_id, current_revision_id, vote_count, reply_count, \
    view_count, created_at, updated_at";

/// Provides CRUD operations for questions.
pub struct MainPostRepo;

impl MainPostRepo {
    /// Create a question together with its first revision (and tags).
    pub async fn create(
        pool: &PgPool,
        title: &str,
        author_id: DbId,
        first: NewRevision<'_>,
    ) -> Result<(MainPost, Revision), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO main_posts (title, author_id) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let mut post = sqlx::query_as::<_, MainPost>(&query)
            .bind(title)
            .bind(author_id)
            .fetch_one(&mut *tx)
            .await?;

        let revision = RevisionRepo::create_in_tx::<MainPostHistory>(&mut tx, post.id, first)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        post.current_revision_id = Some(revision.id);

        tx.commit().await?;
        Ok((post, revision))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MainPost>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM main_posts WHERE id = $1");
        sqlx::query_as::<_, MainPost>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List questions for an index tab.
    pub async fn list(
        pool: &PgPool,
        tab: IndexTab,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MainPost>, sqlx::Error> {
        let filter = if tab.unanswered_only() {
            "WHERE reply_count = 0 "
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM main_posts \
             {filter}\
             ORDER BY {} \
             LIMIT $1 OFFSET $2",
            tab.order_by()
        );
        sqlx::query_as::<_, MainPost>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Record a view of a question.
    ///
    /// A viewer seen within `window_secs` is not counted again. Views with no
    /// viewer key are always counted. Returns `None` if the post does not
    /// exist, otherwise whether `view_count` was incremented.
    pub async fn record_view(
        pool: &PgPool,
        post_id: DbId,
        viewer_key: Option<&str>,
        window_secs: i64,
    ) -> Result<Option<bool>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Serializes concurrent views of the same post so the dedup check holds.
        let locked: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM main_posts WHERE id = $1 FOR UPDATE")
                .bind(post_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(None);
        }

        if let Some(key) = viewer_key {
            let (last_viewed, now): (Option<Timestamp>, Timestamp) = sqlx::query_as(
                "SELECT MAX(viewed_at), NOW() FROM post_views \
                 WHERE post_id = $1 AND viewer_key = $2",
            )
            .bind(post_id)
            .bind(key)
            .fetch_one(&mut *tx)
            .await?;

            if is_duplicate_view(last_viewed, now, window_secs) {
                tx.commit().await?;
                return Ok(Some(false));
            }

            sqlx::query("INSERT INTO post_views (post_id, viewer_key) VALUES ($1, $2)")
                .bind(post_id)
                .bind(key)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("UPDATE main_posts SET view_count = view_count + 1 WHERE id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(true))
    }
}
