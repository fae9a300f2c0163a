//! Repository for the `pages` table.

use biowiki_core::types::DbId;
use sqlx::PgPool;

use crate::models::page::Page;
use crate::models::revision::{NewRevision, PageHistory, Revision};
use crate::repositories::RevisionRepo;

/// Column list for `pages` queries.
pub(crate) const COLUMNS: &str = "id, title, current_revision_id, created_at, updated_at";

/// Provides CRUD operations for wiki pages.
pub struct PageRepo;

impl PageRepo {
    /// Create a page together with its first revision.
    ///
    /// A duplicate title fails with a unique violation on `uq_pages_title`.
    pub async fn create(
        pool: &PgPool,
        title: &str,
        first: NewRevision<'_>,
    ) -> Result<(Page, Revision), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("INSERT INTO pages (title) VALUES ($1) RETURNING {COLUMNS}");
        let mut page = sqlx::query_as::<_, Page>(&query)
            .bind(title)
            .fetch_one(&mut *tx)
            .await?;

        let revision = RevisionRepo::create_in_tx::<PageHistory>(&mut tx, page.id, first)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        page.current_revision_id = Some(revision.id);

        tx.commit().await?;
        Ok((page, revision))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a page by its exact title.
    pub async fn find_by_title(pool: &PgPool, title: &str) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE title = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(title)
            .fetch_optional(pool)
            .await
    }

    /// List pages alphabetically.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Page>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pages \
             ORDER BY title ASC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
