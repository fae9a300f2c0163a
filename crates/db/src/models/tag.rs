//! Tag models and DTOs.

use biowiki_core::tag_tree::TagLink;
use biowiki_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::main_post::MainPost;
use crate::models::page::Page;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `tags` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub parent_id: Option<DbId>,
    pub wiki_page_id: Option<DbId>,
    pub categories: Vec<String>,
    pub icon: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Lightweight tag info returned when listing tags of a page or post.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TagInfo {
    pub id: DbId,
    pub name: String,
    pub parent_id: Option<DbId>,
}

/// One row of an ancestor-chain query.
#[derive(Debug, Clone, FromRow)]
pub struct TagLinkRow {
    pub id: DbId,
    pub name: String,
    pub parent_id: Option<DbId>,
}

impl From<TagLinkRow> for TagLink {
    fn from(row: TagLinkRow) -> Self {
        TagLink {
            id: row.id,
            name: row.name,
            parent_id: row.parent_id,
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating a tag.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTag {
    pub name: String,
    /// Parent tag name. Missing or empty creates a root tag.
    pub parent_name: Option<String>,
    /// Title of the wiki page describing this tag.
    pub wiki_page: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub icon: Option<String>,
}

/// DTO for editing a tag. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTag {
    pub name: Option<String>,
    /// New parent name; an empty string turns the tag into a root.
    pub parent_name: Option<String>,
    /// New linked page title; an empty string unlinks the page.
    pub wiki_page: Option<String>,
    pub categories: Option<Vec<String>>,
    /// New icon; an empty string removes it.
    pub icon: Option<String>,
}

/// Resolved storage values for a tag insert.
#[derive(Debug, Clone)]
pub struct NewTag<'a> {
    pub name: &'a str,
    pub parent_id: Option<DbId>,
    pub wiki_page_id: Option<DbId>,
    pub categories: &'a [String],
    pub icon: Option<&'a str>,
    pub created_by: Option<DbId>,
}

/// Resolved storage values for a tag update. `None` leaves a column unchanged.
#[derive(Debug, Clone, Default)]
pub struct TagChanges<'a> {
    pub name: Option<&'a str>,
    /// `Some(None)` clears the parent.
    pub parent_id: Option<Option<DbId>>,
    /// `Some(None)` unlinks the wiki page.
    pub wiki_page_id: Option<Option<DbId>>,
    pub categories: Option<&'a [String]>,
    /// `Some(None)` removes the icon.
    pub icon: Option<Option<&'a str>>,
}

/// Query parameters for `GET /api/v1/tags/suggest`.
#[derive(Debug, Clone, Deserialize)]
pub struct TagSuggestParams {
    /// Substring to look for in tag names.
    #[serde(default)]
    pub suggestion: String,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

/// Response for the tag detail endpoint.
#[derive(Debug, Serialize)]
pub struct TagDetail {
    #[serde(flatten)]
    pub tag: Tag,
    pub path: String,
    pub children: Vec<TagInfo>,
    pub wiki_page: Option<Page>,
    pub pages: Vec<Page>,
    /// Present on the `Posts` tab (the default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<Vec<MainPost>>,
}

/// Response for tag creation and path lookups.
#[derive(Debug, Serialize)]
pub struct TagPath {
    pub name: String,
    pub path: String,
}
