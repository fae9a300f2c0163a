//! Validation of submitted titles, content, and summaries.

use crate::error::CoreError;

/// Maximum length of a page or post title (characters).
pub const MAX_TITLE_LENGTH: usize = 255;

/// Maximum length of revision content (characters).
pub const MAX_CONTENT_LENGTH: usize = 100_000;

/// Maximum length of a revision summary (characters).
pub const MAX_SUMMARY_LENGTH: usize = 255;

/// Maximum number of tags attached to one page or post.
pub const MAX_TAGS_PER_ITEM: usize = 20;

/// Validate a title (non-empty, bounded length).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Page titles are unique and appear in URLs with `_` for spaces, so a
/// literal underscore would make two titles share a URL.
pub fn validate_page_title(title: &str) -> Result<(), CoreError> {
    validate_title(title)?;
    if title.contains('_') {
        return Err(CoreError::Validation(
            "Page titles must not contain '_'".into(),
        ));
    }
    Ok(())
}

/// Validate revision content (non-empty, bounded length).
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::Validation("Content must not be empty".into()));
    }
    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Content must be at most {MAX_CONTENT_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_summary(summary: &str) -> Result<(), CoreError> {
    if summary.chars().count() > MAX_SUMMARY_LENGTH {
        return Err(CoreError::Validation(format!(
            "Summary must be at most {MAX_SUMMARY_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a list of tag names attached to an item.
pub fn validate_tag_names(names: &[String]) -> Result<(), CoreError> {
    if names.len() > MAX_TAGS_PER_ITEM {
        return Err(CoreError::Validation(format!(
            "A maximum of {MAX_TAGS_PER_ITEM} tags is allowed"
        )));
    }
    names
        .iter()
        .try_for_each(|name| crate::tag_tree::validate_tag_name(name))
}

/// URL form of a page title (`"Gene Ontology"` -> `"Gene_Ontology"`).
pub fn url_title(title: &str) -> String {
    title.replace(' ', "_")
}

/// Inverse of [`url_title`].
pub fn title_from_url(segment: &str) -> String {
    segment.replace('_', " ")
}
