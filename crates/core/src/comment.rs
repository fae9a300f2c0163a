//! Wiki page comment classification and status transitions.
//!
//! Comments move forward through `initialized -> in_progress ->
//! close_pending -> closed`. A pending close may be sent back to work, and a
//! closed comment may be reopened. The revision a comment was resolved in
//! (`final_revision`) is only recorded on entering `closed`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length of a comment's free-text detail (characters).
pub const MAX_DETAIL_LENGTH: usize = 10_000;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentStatus {
    Initialized,
    InProgress,
    ClosePending,
    Closed,
}

impl CommentStatus {
    pub const ALL: [CommentStatus; 4] = [
        Self::Initialized,
        Self::InProgress,
        Self::ClosePending,
        Self::Closed,
    ];

    /// String representation for database storage and the JSON API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialized => "initialized",
            Self::InProgress => "in_progress",
            Self::ClosePending => "close_pending",
            Self::Closed => "closed",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Initialized => "initialized",
            Self::InProgress => "in progress",
            Self::ClosePending => "close pending",
            Self::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Invalid comment status '{s}'")))
    }

    /// Statuses reachable from `self` in one step.
    ///
    /// - `initialized`   -> `in_progress`
    /// - `in_progress`   -> `close_pending`
    /// - `close_pending` -> `closed`, `in_progress` (close rejected)
    /// - `closed`        -> `in_progress` (reopen)
    pub fn valid_transitions(&self) -> &'static [CommentStatus] {
        match self {
            Self::Initialized => &[Self::InProgress],
            Self::InProgress => &[Self::ClosePending],
            Self::ClosePending => &[Self::Closed, Self::InProgress],
            Self::Closed => &[Self::InProgress],
        }
    }

    /// Validate a move to `next` and report what happens to `final_revision`.
    pub fn transition_to(&self, next: CommentStatus) -> Result<FinalRevisionChange, CoreError> {
        if !self.valid_transitions().contains(&next) {
            return Err(CoreError::InvalidTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        Ok(match (self, next) {
            (_, Self::Closed) => FinalRevisionChange::SetToCurrent,
            (Self::Closed, _) => FinalRevisionChange::Clear,
            _ => FinalRevisionChange::Keep,
        })
    }
}

impl std::fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effect of a status transition on the comment's `final_revision`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalRevisionChange {
    /// Record the page's current revision.
    SetToCurrent,
    /// Reopened: the comment no longer has a resolving revision.
    Clear,
    Keep,
}

// ---------------------------------------------------------------------------
// Type and issue kind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentType {
    Issue,
    Request,
    #[default]
    Discuss,
}

impl CommentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::Request => "request",
            Self::Discuss => "discuss",
        }
    }
}

/// What an `issue` comment asks editors to fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Grammar,
    Wikilink,
    Expand,
    CheckReference,
    AddReference,
    Image,
    Lead,
    NewInfo,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grammar => "grammar",
            Self::Wikilink => "wikilink",
            Self::Expand => "expand",
            Self::CheckReference => "check_reference",
            Self::AddReference => "add_reference",
            Self::Image => "image",
            Self::Lead => "lead",
            Self::NewInfo => "new_info",
        }
    }

}

/// An issue kind is required for `issue` comments and not allowed otherwise.
pub fn validate_issue(
    comment_type: CommentType,
    issue: Option<IssueKind>,
) -> Result<(), CoreError> {
    match (comment_type, issue) {
        (CommentType::Issue, None) => Err(CoreError::Validation(
            "Issue comments must specify an issue kind".into(),
        )),
        (CommentType::Issue, Some(_)) | (_, None) => Ok(()),
        (other, Some(_)) => Err(CoreError::Validation(format!(
            "Issue kind is only allowed on issue comments, not '{}'",
            other.as_str()
        ))),
    }
}

pub fn validate_detail(detail: &str) -> Result<(), CoreError> {
    if detail.chars().count() > MAX_DETAIL_LENGTH {
        return Err(CoreError::Validation(format!(
            "Detail exceeds maximum length of {MAX_DETAIL_LENGTH} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
