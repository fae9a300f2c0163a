//! Repository for the generic `votes` table.
//!
//! Main posts and replies cache their tally in `vote_count`; the cache is
//! refreshed in the same transaction as the vote. Page tallies are always
//! computed on read.

use biowiki_core::types::DbId;
use biowiki_core::votes::{tally, VoteTarget};
use sqlx::{PgConnection, PgPool};

/// Table caching `vote_count` for a target kind, if any.
fn cached_count_table(target: VoteTarget) -> Option<&'static str> {
    match target {
        VoteTarget::Page => None,
        VoteTarget::MainPost => Some("main_posts"),
        VoteTarget::ReplyPost => Some("reply_posts"),
    }
}

/// Tally as stored in an `INTEGER` cache column, saturating at the bounds.
fn cached_count(total: i64) -> i32 {
    i32::try_from(total).unwrap_or(if total < 0 { i32::MIN } else { i32::MAX })
}

/// Provides vote casting and tallies.
pub struct VoteRepo;

impl VoteRepo {
    /// Record (or change) a voter's choice on an object and return the new tally.
    pub async fn cast(
        pool: &PgPool,
        voter_id: DbId,
        target: VoteTarget,
        object_id: DbId,
        choice: i16,
    ) -> Result<i64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let cache = cached_count_table(target);
        if let Some(table) = cache {
            // Lock the object so concurrent votes refresh the cache in order.
            let lock = format!("SELECT id FROM {table} WHERE id = $1 FOR UPDATE");
            sqlx::query(&lock)
                .bind(object_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            "INSERT INTO votes (voter_id, content_type, object_id, choice) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (voter_id, content_type, object_id) \
             DO UPDATE SET choice = EXCLUDED.choice",
        )
        .bind(voter_id)
        .bind(target.as_str())
        .bind(object_id)
        .bind(choice)
        .execute(&mut *tx)
        .await?;

        let total = Self::tally_in(&mut tx, target, object_id).await?;

        if let Some(table) = cache {
            let refresh = format!("UPDATE {table} SET vote_count = $2 WHERE id = $1");
            sqlx::query(&refresh)
                .bind(object_id)
                .bind(cached_count(total))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(total)
    }

    /// Upvotes minus downvotes for an object.
    pub async fn count(
        pool: &PgPool,
        target: VoteTarget,
        object_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::tally_in(&mut conn, target, object_id).await
    }

    async fn tally_in(
        conn: &mut PgConnection,
        target: VoteTarget,
        object_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let (up, down): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*) FILTER (WHERE choice = 1), COUNT(*) FILTER (WHERE choice = -1) \
             FROM votes WHERE content_type = $1 AND object_id = $2",
        )
        .bind(target.as_str())
        .bind(object_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(tally(up, down))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_count_saturates() {
        assert_eq!(cached_count(-3), -3);
        assert_eq!(cached_count(i64::from(i32::MAX) + 1), i32::MAX);
        assert_eq!(cached_count(i64::from(i32::MIN) - 1), i32::MIN);
    }
}
