//! Repository for the `tags` table and the page/post tag junctions.
//!
//! Tags form a forest through `parent_id`. Ancestor chains are loaded with a
//! depth-bounded recursive query so a corrupted (cyclic) chain terminates and
//! can be reported by `biowiki_core::tag_tree::resolve_path`.

use biowiki_core::tag_tree::{TagLink, MAX_TAG_DEPTH};
use biowiki_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::main_post::MainPost;
use crate::models::page::Page;
use crate::models::revision::{Revisioned, TagJunction};
use crate::models::tag::{NewTag, Tag, TagChanges, TagInfo, TagLinkRow};
use crate::repositories::{main_post_repo, page_repo};

/// Column list for `tags` queries.
const TAG_COLUMNS: &str = "\
    id, name, parent_id, wiki_page_id, categories, icon, \
    created_by, created_at, updated_at";

/// Provides CRUD and tree operations for tags.
pub struct TagRepo;

impl TagRepo {
    // -----------------------------------------------------------------------
    // Tag CRUD
    // -----------------------------------------------------------------------

    /// Insert a tag. A duplicate name fails on `uq_tags_name`.
    pub async fn create(pool: &PgPool, new: &NewTag<'_>) -> Result<Tag, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (name, parent_id, wiki_page_id, categories, icon, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {TAG_COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(new.name)
            .bind(new.parent_id)
            .bind(new.wiki_page_id)
            .bind(new.categories)
            .bind(new.icon)
            .bind(new.created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags WHERE id = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a tag by its exact name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags WHERE name = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Apply a partial update. Returns `None` if the tag does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &TagChanges<'_>,
    ) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!(
            "UPDATE tags SET \
                name = COALESCE($2, name), \
                parent_id = CASE WHEN $3 THEN $4 ELSE parent_id END, \
                wiki_page_id = CASE WHEN $5 THEN $6 ELSE wiki_page_id END, \
                categories = COALESCE($7, categories), \
                icon = CASE WHEN $8 THEN $9 ELSE icon END \
             WHERE id = $1 \
             RETURNING {TAG_COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .bind(changes.name)
            .bind(changes.parent_id.is_some())
            .bind(changes.parent_id.flatten())
            .bind(changes.wiki_page_id.is_some())
            .bind(changes.wiki_page_id.flatten())
            .bind(changes.categories)
            .bind(changes.icon.is_some())
            .bind(changes.icon.flatten())
            .fetch_optional(pool)
            .await
    }

    /// Delete a tag, moving its children up to the tag's own parent.
    ///
    /// Returns the number of children reparented, or `None` if the tag did
    /// not exist.
    pub async fn delete_reparenting(pool: &PgPool, id: DbId) -> Result<Option<u64>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row: Option<(Option<DbId>,)> =
            sqlx::query_as("SELECT parent_id FROM tags WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((parent_id,)) = row else {
            return Ok(None);
        };

        let moved = sqlx::query("UPDATE tags SET parent_id = $2 WHERE parent_id = $1")
            .bind(id)
            .bind(parent_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(moved))
    }

    // -----------------------------------------------------------------------
    // Tree queries
    // -----------------------------------------------------------------------

    /// Ancestor chain of a tag: the tag itself first, its root last.
    ///
    /// At most `MAX_TAG_DEPTH + 1` links are returned so an over-deep or
    /// cyclic chain is visible to the caller without looping.
    pub async fn ancestors(pool: &PgPool, id: DbId) -> Result<Vec<TagLink>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TagLinkRow>(
            "WITH RECURSIVE chain AS ( \
                SELECT id, name, parent_id, 1 AS depth FROM tags WHERE id = $1 \
                UNION ALL \
                SELECT t.id, t.name, t.parent_id, c.depth + 1 \
                FROM tags t JOIN chain c ON t.id = c.parent_id \
                WHERE c.depth <= $2 \
             ) \
             SELECT id, name, parent_id FROM chain ORDER BY depth",
        )
        .bind(id)
        .bind(MAX_TAG_DEPTH as i32)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(TagLink::from).collect())
    }

    /// Tags without a parent, alphabetically.
    pub async fn list_roots(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!(
            "SELECT {TAG_COLUMNS} FROM tags \
             WHERE parent_id IS NULL \
             ORDER BY name ASC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Direct children of a tag, alphabetically.
    pub async fn children(pool: &PgPool, id: DbId) -> Result<Vec<TagInfo>, sqlx::Error> {
        sqlx::query_as::<_, TagInfo>(
            "SELECT id, name, parent_id FROM tags WHERE parent_id = $1 ORDER BY name ASC",
        )
        .bind(id)
        .fetch_all(pool)
        .await
    }

    /// Tags whose name contains `needle`, alphabetically.
    ///
    /// `needle` is matched literally; `%` and `_` carry no wildcard meaning.
    pub async fn suggest(
        pool: &PgPool,
        needle: &str,
        case_sensitive: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Tag>, sqlx::Error> {
        let op = if case_sensitive { "LIKE" } else { "ILIKE" };
        let query = format!(
            "SELECT {TAG_COLUMNS} FROM tags \
             WHERE name {op} $1 \
             ORDER BY name ASC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(biowiki_core::search::contains_pattern(needle))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Page / post associations
    // -----------------------------------------------------------------------

    /// Look up tags by exact name. Unknown names are simply absent.
    pub async fn find_by_names(
        pool: &PgPool,
        names: &[String],
    ) -> Result<Vec<TagInfo>, sqlx::Error> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, TagInfo>(
            "SELECT id, name, parent_id FROM tags WHERE name = ANY($1) ORDER BY name ASC",
        )
        .bind(names)
        .fetch_all(pool)
        .await
    }

    /// Replace the tags attached to an item inside the caller's transaction.
    pub async fn replace_item_tags(
        conn: &mut PgConnection,
        junction: TagJunction,
        item_id: DbId,
        tag_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let clear = format!("DELETE FROM {} WHERE {} = $1", junction.table, junction.item_column);
        sqlx::query(&clear)
            .bind(item_id)
            .execute(&mut *conn)
            .await?;

        if tag_ids.is_empty() {
            return Ok(());
        }
        let insert = format!(
            "INSERT INTO {} ({}, tag_id) \
             SELECT $1, UNNEST($2::BIGINT[]) \
             ON CONFLICT DO NOTHING",
            junction.table, junction.item_column
        );
        sqlx::query(&insert)
            .bind(item_id)
            .bind(tag_ids)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Tags attached to an item. Kinds without a tag junction have none.
    pub async fn tags_for_item<K: Revisioned>(
        pool: &PgPool,
        item_id: DbId,
    ) -> Result<Vec<TagInfo>, sqlx::Error> {
        let Some(junction) = K::TAG_JUNCTION else {
            return Ok(Vec::new());
        };
        let query = format!(
            "SELECT t.id, t.name, t.parent_id FROM tags t \
             JOIN {} j ON j.tag_id = t.id \
             WHERE j.{} = $1 \
             ORDER BY t.name ASC",
            junction.table, junction.item_column
        );
        sqlx::query_as::<_, TagInfo>(&query)
            .bind(item_id)
            .fetch_all(pool)
            .await
    }

    /// Wiki pages carrying a tag.
    pub async fn pages_for_tag(pool: &PgPool, tag_id: DbId) -> Result<Vec<Page>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM pages \
             WHERE id IN (SELECT page_id FROM page_tags WHERE tag_id = $1) \
             ORDER BY title ASC",
            page_repo::COLUMNS
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(tag_id)
            .fetch_all(pool)
            .await
    }

    /// Questions carrying a tag, most recently updated first.
    pub async fn posts_for_tag(
        pool: &PgPool,
        tag_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MainPost>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM main_posts \
             WHERE id IN (SELECT post_id FROM main_post_tags WHERE tag_id = $1) \
             ORDER BY updated_at DESC, id DESC \
             LIMIT $2 OFFSET $3",
            main_post_repo::COLUMNS
        );
        sqlx::query_as::<_, MainPost>(&query)
            .bind(tag_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
