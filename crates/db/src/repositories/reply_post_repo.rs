//! Repository for the `reply_posts` table.

use std::collections::HashMap;

use biowiki_core::types::DbId;
use biowiki_core::votes::VoteTarget;
use sqlx::PgPool;

use crate::models::reply_post::{ReplyPost, ReplyWithRevision};
use crate::models::revision::{NewRevision, ReplyPostHistory, Revision};
use crate::repositories::RevisionRepo;

/// Column list for `reply_posts` queries.
const COLUMNS: &str = "\
    id, main_post_id, author_id, current_revision_id, vote_count, created_at, updated_at";

/// Provides CRUD operations for replies.
pub struct ReplyPostRepo;

impl ReplyPostRepo {
    /// Create a reply with its first revision and bump the question's
    /// `reply_count`, all in one transaction.
    ///
    /// Returns `None` if the question does not exist.
    pub async fn create(
        pool: &PgPool,
        main_post_id: DbId,
        author_id: DbId,
        first: NewRevision<'_>,
    ) -> Result<Option<(ReplyPost, Revision)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let question: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM main_posts WHERE id = $1 FOR UPDATE")
                .bind(main_post_id)
                .fetch_optional(&mut *tx)
                .await?;
        if question.is_none() {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO reply_posts (main_post_id, author_id) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let mut reply = sqlx::query_as::<_, ReplyPost>(&query)
            .bind(main_post_id)
            .bind(author_id)
            .fetch_one(&mut *tx)
            .await?;

        let revision = RevisionRepo::create_in_tx::<ReplyPostHistory>(&mut tx, reply.id, first)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        reply.current_revision_id = Some(revision.id);

        sqlx::query("UPDATE main_posts SET reply_count = reply_count + 1 WHERE id = $1")
            .bind(main_post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some((reply, revision)))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ReplyPost>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reply_posts WHERE id = $1");
        sqlx::query_as::<_, ReplyPost>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replies to a question in posting order, each with its current revision.
    pub async fn list_with_revisions(
        pool: &PgPool,
        main_post_id: DbId,
    ) -> Result<Vec<ReplyWithRevision>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reply_posts \
             WHERE main_post_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );
        let replies = sqlx::query_as::<_, ReplyPost>(&query)
            .bind(main_post_id)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = replies.iter().map(|r| r.id).collect();
        let mut revisions: HashMap<DbId, Revision> =
            RevisionRepo::current_for_items::<ReplyPostHistory>(pool, &ids)
                .await?
                .into_iter()
                .map(|rev| (rev.item_id, rev))
                .collect();

        Ok(replies
            .into_iter()
            .map(|reply| {
                let current_revision = revisions.remove(&reply.id);
                ReplyWithRevision {
                    reply,
                    current_revision,
                }
            })
            .collect())
    }

    /// Delete a reply and its votes, and decrement the question's `reply_count`.
    ///
    /// Returns the deleted row, or `None` if it did not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<ReplyPost>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("DELETE FROM reply_posts WHERE id = $1 RETURNING {COLUMNS}");
        let deleted = sqlx::query_as::<_, ReplyPost>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(reply) = &deleted {
            sqlx::query("DELETE FROM votes WHERE content_type = $1 AND object_id = $2")
                .bind(VoteTarget::ReplyPost.as_str())
                .bind(reply.id)
                .execute(&mut *tx)
                .await?;

            sqlx::query(
                "UPDATE main_posts SET reply_count = GREATEST(reply_count - 1, 0) WHERE id = $1",
            )
            .bind(reply.main_post_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(deleted)
    }
}
