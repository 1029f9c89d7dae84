//! Route exclusion by keyword
//!
//! Departures whose route description contains any configured keyword are
//! dropped before normalization. Matching is a case-insensitive substring
//! search using the Aho-Corasick algorithm, so the cost per event does not
//! grow with the number of keywords.

use aho_corasick::{AhoCorasick, MatchKind};

use crate::error::ApplicationError;

/// Compiled set of exclusion keywords
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    keywords: Vec<String>,
    matcher: Option<AhoCorasick>,
}

impl KeywordFilter {
    /// Compile `keywords`
    ///
    /// Keywords are lowercased and otherwise kept verbatim, surrounding
    /// whitespace included. Blank keywords are ignored, since an empty
    /// pattern would match every route.
    ///
    /// # Errors
    ///
    /// [`ApplicationError::Configuration`] if the automaton cannot be built.
    pub fn new<I, S>(keywords: I) -> Result<Self, ApplicationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().to_lowercase())
            .filter(|k| !k.trim().is_empty())
            .collect();

        if keywords.is_empty() {
            return Ok(Self::none());
        }

        let matcher = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostFirst)
            .build(&keywords)
            .map_err(|e| ApplicationError::Configuration(format!("exclusion keywords: {e}")))?;

        Ok(Self {
            keywords,
            matcher: Some(matcher),
        })
    }

    /// Filter that excludes nothing
    #[must_use]
    pub const fn none() -> Self {
        Self {
            keywords: Vec::new(),
            matcher: None,
        }
    }

    /// Whether a route with this description is excluded
    #[must_use]
    pub fn is_excluded(&self, route_description: &str) -> bool {
        let Some(matcher) = &self.matcher else {
            return false;
        };
        matcher.is_match(&route_description.to_lowercase())
    }

    /// Keywords in effect, lowercased
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Whether any keyword is configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl Default for KeywordFilter {
    fn default() -> Self {
        Self::none()
    }
}
