//! Message exclusion filtering.
//!
//! Some infrastructure noise phrases should never page a human even at
//! error level. The filter holds an explicit substring list evaluated
//! against the lowercased message, so policy stays data-driven rather
//! than embedded in logic.

/// Phrases excluded by default.
pub const DEFAULT_EXCLUSIONS: &[&str] = &["not instantiable", "not instantiate"];

/// Case-insensitive substring filter over record messages.
#[derive(Debug, Clone)]
pub struct MessageFilter {
    patterns: Vec<String>,
}

impl MessageFilter {
    /// Create a filter from custom patterns. Patterns are matched
    /// case-insensitively.
    #[must_use]
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.into().to_lowercase())
                .collect(),
        }
    }

    /// Check whether the message matches any exclusion pattern.
    #[must_use]
    pub fn matches(&self, message: &str) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let message = message.to_lowercase();
        self.patterns.iter().any(|p| message.contains(p))
    }
}

impl Default for MessageFilter {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUSIONS.iter().copied())
    }
}
