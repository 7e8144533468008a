//! Apology detection.

use crate::options::DEFAULT_APOLOGY_KEYWORDS;

/// Decides whether a chat line counts as an apology.
///
/// A line qualifies when its lowercase form contains any keyword as a plain
/// substring; there is no word-boundary check, so "sorryish" still counts.
///
/// ```rust
/// use plugin_auto_tk_warn::ApologyMatcher;
///
/// let matcher = ApologyMatcher::new(["sorry", "my bad"]);
/// assert!(matcher.is_apology("SORRY!"));
/// assert!(!matcher.is_apology("not going to say it"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApologyMatcher {
    keywords: Vec<String>,
}

impl ApologyMatcher {
    /// Builds a matcher from configured keywords.
    ///
    /// Keywords are trimmed and lowercased; blank ones are dropped. If nothing
    /// is left the default keyword list is used instead.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        if keywords.is_empty() {
            keywords = DEFAULT_APOLOGY_KEYWORDS.iter().map(|k| k.to_string()).collect();
        }

        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_apology(&self, message: &str) -> bool {
        let message = message.to_lowercase();
        self.keywords.iter().any(|keyword| message.contains(keyword.as_str()))
    }
}

impl Default for ApologyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_APOLOGY_KEYWORDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keywords_match_case_insensitively() {
        let matcher = ApologyMatcher::default();

        assert!(matcher.is_apology("SORRY!"));
        assert!(matcher.is_apology("i am sry"));
        assert!(matcher.is_apology("Apologies everyone"));
        assert!(matcher.is_apology("oh My Bad mate"));
        assert!(matcher.is_apology("please forgive me"));
        assert!(!matcher.is_apology("not going to say it"));
        assert!(!matcher.is_apology(""));
    }

    #[test]
    fn test_substring_without_word_boundary() {
        let matcher = ApologyMatcher::new(["sorry"]);
        assert!(matcher.is_apology("sorryish"));
        assert!(matcher.is_apology("imsorrylol"));
    }

    #[test]
    fn test_keywords_are_normalised() {
        let matcher = ApologyMatcher::new(["  Oops ", "", "MY FAULT"]);
        assert_eq!(matcher.keywords(), &["oops".to_string(), "my fault".to_string()]);
        assert!(matcher.is_apology("oops, my fault"));
        assert!(!matcher.is_apology("sorry"));
    }

    #[test]
    fn test_empty_keyword_list_falls_back_to_defaults() {
        let empty: Vec<String> = Vec::new();
        assert_eq!(ApologyMatcher::new(empty), ApologyMatcher::default());
        assert_eq!(ApologyMatcher::new(["", "  "]), ApologyMatcher::default());
    }
}
