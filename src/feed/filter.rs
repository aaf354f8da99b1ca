//! Keyword and language filtering applied on the feed thread.

use crate::feed::types::RawRecord;

/// Decides which raw records reach the window.
///
/// The keyword matches case-insensitively against the text, the extended
/// text, the author and the expanded URLs. A record without a `lang` tag
/// passes the language check.
#[derive(Debug, Clone)]
pub struct FeedFilter {
    keyword: String,
    language: Option<String>,
}

impl FeedFilter {
    pub fn new(keyword: &str, language: Option<&str>) -> Self {
        Self {
            keyword: keyword.trim().to_lowercase(),
            language: language.map(|l| l.trim().to_lowercase()),
        }
    }

    /// The normalized keyword.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Check a record against both criteria.
    pub fn matches(&self, record: &RawRecord) -> bool {
        self.language_matches(record) && self.keyword_matches(record)
    }

    fn language_matches(&self, record: &RawRecord) -> bool {
        match (&self.language, &record.lang) {
            (Some(wanted), Some(lang)) => lang.eq_ignore_ascii_case(wanted),
            _ => true,
        }
    }

    fn keyword_matches(&self, record: &RawRecord) -> bool {
        if self.keyword.is_empty() {
            return true;
        }

        let hit = |s: &str| s.to_lowercase().contains(&self.keyword);

        record.text.as_deref().is_some_and(hit)
            || record.full_text().is_some_and(hit)
            || record.screen_name().is_some_and(hit)
            || record.expanded_urls().any(hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> RawRecord {
        RawRecord::from_json(json).unwrap()
    }

    #[test]
    fn test_keyword_case_insensitive() {
        let filter = FeedFilter::new("Rust", Some("en"));
        assert!(filter.matches(&record(r#"{"text": "I love RUST today"}"#)));
        assert!(!filter.matches(&record(r#"{"text": "I love Go today"}"#)));
    }

    #[test]
    fn test_keyword_matches_extended_text_and_urls() {
        let filter = FeedFilter::new("rust", None);
        assert!(filter.matches(&record(
            r#"{"text": "truncated…", "extended_tweet": {"full_text": "truncated text about rust"}}"#
        )));
        assert!(filter.matches(&record(
            r#"{"text": "look", "entities": {"urls": [{"expanded_url": "https://rust-lang.org/"}]}}"#
        )));
        assert!(filter.matches(&record(r#"{"text": "hello", "user": {"screen_name": "rustacean"}}"#)));
    }

    #[test]
    fn test_language_filter() {
        let filter = FeedFilter::new("rust", Some("en"));
        assert!(filter.matches(&record(r#"{"text": "rust", "lang": "EN"}"#)));
        assert!(!filter.matches(&record(r#"{"text": "rust", "lang": "de"}"#)));
        // Records without a language tag pass.
        assert!(filter.matches(&record(r#"{"text": "rust"}"#)));
    }

    #[test]
    fn test_empty_keyword_matches_everything() {
        let filter = FeedFilter::new("  ", None);
        assert!(filter.matches(&record(r#"{"text": "anything"}"#)));
    }
}
