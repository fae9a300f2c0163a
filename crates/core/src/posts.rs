//! Q&A board listing rules.

/// Tabs on the post index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexTab {
    /// Every post, newest first.
    #[default]
    All,
    /// Most recently modified first.
    Latest,
    /// Highest vote count first.
    Votes,
    /// Posts without replies.
    Unanswered,
}

impl IndexTab {
    /// Parse the `?tab=` query value. Unknown or missing values select [`IndexTab::All`].
    pub fn from_query(tab: Option<&str>) -> Self {
        match tab.map(str::to_ascii_lowercase).as_deref() {
            Some("latest") => Self::Latest,
            Some("votes") => Self::Votes,
            Some("unanswered") => Self::Unanswered,
            _ => Self::All,
        }
    }

    /// SQL `ORDER BY` clause for `main_posts`.
    pub fn order_by(&self) -> &'static str {
        match self {
            Self::Latest => "updated_at DESC, id DESC",
            Self::Votes => "vote_count DESC, id DESC",
            Self::All | Self::Unanswered => "created_at DESC, id DESC",
        }
    }

    pub fn unanswered_only(&self) -> bool {
        matches!(self, Self::Unanswered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_names_are_case_insensitive() {
        assert_eq!(IndexTab::from_query(Some("Latest")), IndexTab::Latest);
        assert_eq!(IndexTab::from_query(Some("votes")), IndexTab::Votes);
        assert_eq!(IndexTab::from_query(Some("Unanswered")), IndexTab::Unanswered);
    }

    #[test]
    fn unknown_tab_lists_everything() {
        assert_eq!(IndexTab::from_query(None), IndexTab::All);
        assert_eq!(IndexTab::from_query(Some("Hot")), IndexTab::All);
    }

    #[test]
    fn only_unanswered_filters() {
        assert!(IndexTab::Unanswered.unanswered_only());
        assert!(!IndexTab::Latest.unanswered_only());
    }
}
