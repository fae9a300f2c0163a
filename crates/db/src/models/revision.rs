//! Revision rows shared by wiki pages, main posts, and replies.
//!
//! Each content kind keeps its revisions in its own table. The [`Revisioned`]
//! trait describes that table layout so one repository can number revisions
//! and repoint `current_revision_id` for every kind.

use biowiki_core::revision::{CharStats, DiffFragment};
use biowiki_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from `page_revisions`, `main_post_revisions`, or `reply_post_revisions`.
///
/// `item_id` is the owning page/post. The char counters are only tracked for
/// wiki pages and are `None` for posts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Revision {
    pub id: DbId,
    pub item_id: DbId,
    pub revision_number: i32,
    pub content: String,
    pub revision_summary: Option<String>,
    pub author_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_chars: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_chars: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_chars: Option<i32>,
    pub created_at: Timestamp,
    pub modified_at: Timestamp,
}

/// Input for appending a revision to an item.
#[derive(Debug, Clone, Copy)]
pub struct NewRevision<'a> {
    pub content: &'a str,
    pub summary: Option<&'a str>,
    pub author_id: Option<DbId>,
    /// Replace the item's tags in the same transaction. Ignored for kinds
    /// without a tag junction.
    pub tag_ids: Option<&'a [DbId]>,
}

impl<'a> NewRevision<'a> {
    pub fn new(content: &'a str, author_id: Option<DbId>) -> Self {
        Self {
            content,
            summary: None,
            author_id,
            tag_ids: None,
        }
    }

    pub fn with_summary(mut self, summary: Option<&'a str>) -> Self {
        self.summary = summary;
        self
    }

    pub fn with_tags(mut self, tag_ids: Option<&'a [DbId]>) -> Self {
        self.tag_ids = tag_ids;
        self
    }
}

/// Junction table linking an item kind to tags.
#[derive(Debug, Clone, Copy)]
pub struct TagJunction {
    pub table: &'static str,
    pub item_column: &'static str,
}

/// Table layout of a content kind that owns an append-only revision history.
pub trait Revisioned {
    /// Entity name used in errors and logs.
    const ENTITY: &'static str;
    /// Table holding the items (must have `id`, `current_revision_id`, `updated_at`).
    const ITEM_TABLE: &'static str;
    /// Table holding the revisions.
    const REVISION_TABLE: &'static str;
    /// Foreign-key column in `REVISION_TABLE` pointing at `ITEM_TABLE.id`.
    const ITEM_COLUMN: &'static str;
    /// Whether revisions store `total_chars` / `added_chars` / `deleted_chars`.
    const TRACKS_CHAR_STATS: bool;
    const TAG_JUNCTION: Option<TagJunction>;
}

/// Wiki page histories (`page_revisions`).
pub struct PageHistory;

impl Revisioned for PageHistory {
    const ENTITY: &'static str = "Page";
    const ITEM_TABLE: &'static str = "pages";
    const REVISION_TABLE: &'static str = "page_revisions";
    const ITEM_COLUMN: &'static str = "page_id";
    const TRACKS_CHAR_STATS: bool = true;
    const TAG_JUNCTION: Option<TagJunction> = Some(TagJunction {
        table: "page_tags",
        item_column: "page_id",
    });
}

/// Question histories (`main_post_revisions`).
pub struct MainPostHistory;

impl Revisioned for MainPostHistory {
    const ENTITY: &'static str = "MainPost";
    const ITEM_TABLE: &'static str = "main_posts";
    const REVISION_TABLE: &'static str = "main_post_revisions";
    const ITEM_COLUMN: &'static str = "post_id";
    const TRACKS_CHAR_STATS: bool = false;
    const TAG_JUNCTION: Option<TagJunction> = Some(TagJunction {
        table: "main_post_tags",
        item_column: "post_id",
    });
}

/// Reply histories (`reply_post_revisions`).
pub struct ReplyPostHistory;

impl Revisioned for ReplyPostHistory {
    const ENTITY: &'static str = "ReplyPost";
    const ITEM_TABLE: &'static str = "reply_posts";
    const REVISION_TABLE: &'static str = "reply_post_revisions";
    const ITEM_COLUMN: &'static str = "post_id";
    const TRACKS_CHAR_STATS: bool = false;
    const TAG_JUNCTION: Option<TagJunction> = None;
}

/// Response for a revision compared with its predecessor.
#[derive(Debug, Serialize)]
pub struct RevisionDiff {
    pub item_id: DbId,
    pub revision_number: i32,
    pub previous_revision_number: Option<i32>,
    pub fragments: Vec<DiffFragment>,
    pub stats: CharStats,
}
