//! Tag forest helpers: path resolution, cycle detection, and naming rules.
//!
//! The repository layer loads a tag's ancestor chain (start tag first, root
//! last) and hands it to [`resolve_path`], which verifies the chain before
//! rendering it. A chain that repeats a tag or never reaches a root is a data
//! corruption and is reported as [`CoreError::Integrity`].

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum number of links followed when walking to a root.
pub const MAX_TAG_DEPTH: usize = 64;

/// Maximum length of a tag name.
pub const MAX_TAG_NAME_LENGTH: usize = 100;

/// One link of an ancestor chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLink {
    pub id: DbId,
    pub name: String,
    pub parent_id: Option<DbId>,
}

/// Render the root-first path of the first tag in `chain`, e.g. `"root/child/"`.
///
/// `chain[0]` is the tag itself and each following entry must be the parent of
/// the one before it. The walk fails instead of looping when a tag repeats or
/// the chain is longer than [`MAX_TAG_DEPTH`].
pub fn resolve_path(chain: &[TagLink]) -> Result<String, CoreError> {
    let Some(first) = chain.first() else {
        return Err(CoreError::Internal("Cannot resolve path of empty tag chain".into()));
    };

    let mut visited = HashSet::with_capacity(chain.len());
    let mut path = String::new();
    let mut expected = Some(first.id);

    for (depth, link) in chain.iter().enumerate() {
        if depth >= MAX_TAG_DEPTH {
            return Err(CoreError::Integrity(format!(
                "Tag '{}' is nested deeper than {MAX_TAG_DEPTH} levels",
                first.name
            )));
        }
        if expected != Some(link.id) {
            return Err(CoreError::Integrity(format!(
                "Ancestor chain of tag '{}' is broken at '{}'",
                first.name, link.name
            )));
        }
        if !visited.insert(link.id) {
            return Err(CoreError::Integrity(format!(
                "Cycle detected in ancestors of tag '{}' at '{}'",
                first.name, link.name
            )));
        }
        path.insert(0, '/');
        path.insert_str(0, &link.name);
        expected = link.parent_id;
    }

    if let Some(parent_id) = expected {
        return Err(CoreError::Integrity(format!(
            "Ancestor chain of tag '{}' ends at missing parent {parent_id}",
            first.name
        )));
    }
    Ok(path)
}

/// Whether making `parent_chain[0]` the parent of `tag_id` would close a loop.
///
/// `parent_chain` is the ancestor chain of the proposed parent.
pub fn would_create_cycle(tag_id: DbId, parent_chain: &[TagLink]) -> bool {
    parent_chain.iter().any(|link| link.id == tag_id)
}

/// Message shown before creating a tag, describing where it will live.
pub fn creation_hint(parent_path: Option<&str>) -> String {
    match parent_path {
        Some(path) => format!("This tag will be created under: {path}"),
        None => "Tips: if you want to create a new tag nested under another tag, \
                 please do that in the respective tag page."
            .to_string(),
    }
}

/// Tag names appear in URLs with `_` standing in for spaces.
pub fn name_from_url(segment: &str) -> String {
    segment.replace('_', " ")
}

/// Validate a tag name (non-empty, no `/` or `_`, bounded length).
///
/// Tags are looked up by URL name with `_` read back as a space, so a literal
/// underscore would leave the tag unreachable.
pub fn validate_tag_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Tag name must not be empty".into()));
    }
    if name.chars().count() > MAX_TAG_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Tag name must be at most {MAX_TAG_NAME_LENGTH} characters"
        )));
    }
    if name.contains('/') {
        return Err(CoreError::Validation(
            "Tag name must not contain '/' (it separates path segments)".into(),
        ));
    }
    if name.contains('_') {
        return Err(CoreError::Validation(
            "Tag name must not contain '_' (URLs use it for spaces)".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
