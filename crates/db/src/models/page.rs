//! Wiki page models and DTOs.

use biowiki_core::types::{DbId, Timestamp};
use biowiki_core::validation::url_title;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::revision::Revision;
use crate::models::tag::TagInfo;

/// A row from the `pages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Page {
    pub id: DbId,
    pub title: String,
    pub current_revision_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Page {
    /// Title as it appears in URLs (spaces replaced by `_`).
    pub fn url_title(&self) -> String {
        url_title(&self.title)
    }
}

/// DTO for creating a page together with its first revision.
#[derive(Debug, Deserialize)]
pub struct CreatePage {
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// DTO for editing a page. Every edit creates a new revision.
#[derive(Debug, Deserialize)]
pub struct UpdatePage {
    pub content: String,
    pub summary: Option<String>,
    /// Replaces the page's tags when present.
    pub tags: Option<Vec<String>>,
}

/// A page with its current revision, tags, and net vote count.
#[derive(Debug, Serialize)]
pub struct PageDetail {
    #[serde(flatten)]
    pub page: Page,
    pub url_title: String,
    pub current_revision: Option<Revision>,
    pub tags: Vec<TagInfo>,
    pub vote_count: i64,
}
