//! Repository for the revision tables of every [`Revisioned`] content kind.
//!
//! Revision creation locks the owning item row (`SELECT ... FOR UPDATE`), so
//! concurrent edits of the same item are serialized across processes. The
//! `(item, revision_number)` unique constraint backs this up; a writer that
//! still loses the race is retried once with a freshly read number.

use biowiki_core::revision::{next_revision_number, previous_revision_number, CharStats};
use biowiki_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::revision::{NewRevision, Revision, Revisioned};
use crate::repositories::TagRepo;

/// Retries after losing a revision-number race before surfacing the conflict.
const RACE_RETRIES: u32 = 1;

/// Column list for revision queries, normalized to the [`Revision`] shape.
fn columns<K: Revisioned>() -> String {
    let stats = if K::TRACKS_CHAR_STATS {
        "total_chars, added_chars, deleted_chars"
    } else {
        "NULL::INTEGER AS total_chars, NULL::INTEGER AS added_chars, \
         NULL::INTEGER AS deleted_chars"
    };
    format!(
        "id, {} AS item_id, revision_number, content, revision_summary, author_id, \
         {stats}, created_at, modified_at",
        K::ITEM_COLUMN
    )
}

/// Whether `err` is a unique violation on a `(item, revision_number)` constraint.
pub fn is_revision_number_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err
                    .constraint()
                    .is_some_and(|c| c.starts_with("uq_") && c.ends_with("_number"))
        }
        _ => false,
    }
}

/// Provides append and read operations for item revision histories.
pub struct RevisionRepo;

impl RevisionRepo {
    /// Append a revision to `item_id` and make it the item's current revision.
    ///
    /// Returns `None` if the item does not exist.
    pub async fn create<K: Revisioned>(
        pool: &PgPool,
        item_id: DbId,
        new: NewRevision<'_>,
    ) -> Result<Option<Revision>, sqlx::Error> {
        let mut attempt = 0;
        loop {
            let mut tx = pool.begin().await?;
            match Self::create_in_tx::<K>(&mut tx, item_id, new).await {
                Ok(revision) => {
                    tx.commit().await?;
                    return Ok(revision);
                }
                Err(err) if attempt < RACE_RETRIES && is_revision_number_conflict(&err) => {
                    attempt += 1;
                    tracing::warn!(
                        entity = K::ENTITY,
                        item_id,
                        attempt,
                        "Lost revision number race, retrying"
                    );
                    tx.rollback().await?;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Append a revision inside the caller's transaction.
    ///
    /// Numbers the revision from the latest stored one, computes char stats
    /// for kinds that track them, inserts it, repoints the item's
    /// `current_revision_id`, and replaces the item's tags if requested.
    /// Returns `None` if the item does not exist.
    pub async fn create_in_tx<K: Revisioned>(
        conn: &mut PgConnection,
        item_id: DbId,
        new: NewRevision<'_>,
    ) -> Result<Option<Revision>, sqlx::Error> {
        let lock = format!("SELECT id FROM {} WHERE id = $1 FOR UPDATE", K::ITEM_TABLE);
        let locked: Option<(DbId,)> = sqlx::query_as(&lock)
            .bind(item_id)
            .fetch_optional(&mut *conn)
            .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let latest_query = format!(
            "SELECT revision_number, content FROM {} \
             WHERE {} = $1 \
             ORDER BY revision_number DESC \
             LIMIT 1",
            K::REVISION_TABLE,
            K::ITEM_COLUMN
        );
        let latest: Option<(i32, String)> = sqlx::query_as(&latest_query)
            .bind(item_id)
            .fetch_optional(&mut *conn)
            .await?;
        let revision_number = next_revision_number(latest.as_ref().map(|(n, _)| *n));

        let cols = columns::<K>();
        let revision = if K::TRACKS_CHAR_STATS {
            let previous = latest.as_ref().map_or("", |(_, content)| content.as_str());
            let stats = CharStats::between(previous, new.content);
            let query = format!(
                "INSERT INTO {} \
                    ({}, revision_number, content, revision_summary, author_id, \
                     total_chars, added_chars, deleted_chars) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                 RETURNING {cols}",
                K::REVISION_TABLE,
                K::ITEM_COLUMN
            );
            sqlx::query_as::<_, Revision>(&query)
                .bind(item_id)
                .bind(revision_number)
                .bind(new.content)
                .bind(new.summary)
                .bind(new.author_id)
                .bind(stats.total_chars)
                .bind(stats.added_chars)
                .bind(stats.deleted_chars)
                .fetch_one(&mut *conn)
                .await?
        } else {
            let query = format!(
                "INSERT INTO {} \
                    ({}, revision_number, content, revision_summary, author_id) \
                 VALUES ($1, $2, $3, $4, $5) \
                 RETURNING {cols}",
                K::REVISION_TABLE,
                K::ITEM_COLUMN
            );
            sqlx::query_as::<_, Revision>(&query)
                .bind(item_id)
                .bind(revision_number)
                .bind(new.content)
                .bind(new.summary)
                .bind(new.author_id)
                .fetch_one(&mut *conn)
                .await?
        };

        let repoint = format!(
            "UPDATE {} SET current_revision_id = $2, updated_at = NOW() WHERE id = $1",
            K::ITEM_TABLE
        );
        sqlx::query(&repoint)
            .bind(item_id)
            .bind(revision.id)
            .execute(&mut *conn)
            .await?;

        if let (Some(junction), Some(tag_ids)) = (K::TAG_JUNCTION, new.tag_ids) {
            TagRepo::replace_item_tags(conn, junction, item_id, tag_ids).await?;
        }

        Ok(Some(revision))
    }

    /// Find a revision by its number within an item's history.
    pub async fn find_by_number<K: Revisioned>(
        pool: &PgPool,
        item_id: DbId,
        revision_number: i32,
    ) -> Result<Option<Revision>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} WHERE {} = $1 AND revision_number = $2",
            columns::<K>(),
            K::REVISION_TABLE,
            K::ITEM_COLUMN
        );
        sqlx::query_as::<_, Revision>(&query)
            .bind(item_id)
            .bind(revision_number)
            .fetch_optional(pool)
            .await
    }

    /// The revision numbered one below `revision` in the same item, if any.
    pub async fn get_previous<K: Revisioned>(
        pool: &PgPool,
        revision: &Revision,
    ) -> Result<Option<Revision>, sqlx::Error> {
        match previous_revision_number(revision.revision_number) {
            Some(number) => Self::find_by_number::<K>(pool, revision.item_id, number).await,
            None => Ok(None),
        }
    }

    /// Full history of an item, most recently modified first.
    pub async fn list_history<K: Revisioned>(
        pool: &PgPool,
        item_id: DbId,
    ) -> Result<Vec<Revision>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} \
             WHERE {} = $1 \
             ORDER BY modified_at DESC, revision_number DESC",
            columns::<K>(),
            K::REVISION_TABLE,
            K::ITEM_COLUMN
        );
        sqlx::query_as::<_, Revision>(&query)
            .bind(item_id)
            .fetch_all(pool)
            .await
    }

    /// The revision an item currently points at.
    pub async fn current<K: Revisioned>(
        pool: &PgPool,
        item_id: DbId,
    ) -> Result<Option<Revision>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} \
             WHERE id = (SELECT current_revision_id FROM {} WHERE id = $1)",
            columns::<K>(),
            K::REVISION_TABLE,
            K::ITEM_TABLE
        );
        sqlx::query_as::<_, Revision>(&query)
            .bind(item_id)
            .fetch_optional(pool)
            .await
    }

    /// Current revisions for a batch of items (in no particular order).
    pub async fn current_for_items<K: Revisioned>(
        pool: &PgPool,
        item_ids: &[DbId],
    ) -> Result<Vec<Revision>, sqlx::Error> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {} FROM {} \
             WHERE id IN (SELECT current_revision_id FROM {} WHERE id = ANY($1))",
            columns::<K>(),
            K::REVISION_TABLE,
            K::ITEM_TABLE
        );
        sqlx::query_as::<_, Revision>(&query)
            .bind(item_ids)
            .fetch_all(pool)
            .await
    }
}
