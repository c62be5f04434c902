//! Branch name pattern matching.
//!
//! A [`PatternMatcher`] decides which branches are "safe" branches that must be protected.
//! It is a case-insensitive substring test against a single configured pattern.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;

/// Pattern used when `SAFE_BRANCH_PATTERN` is not configured.
pub const DEFAULT_SAFE_BRANCH_PATTERN: &str = "safe";

/// Case-insensitive substring predicate over branch names.
///
/// An empty or whitespace-only pattern matches nothing, so a blank configuration value can
/// never cause every branch to be protected.
///
/// # Examples
///
/// ```rust
/// use repo_creator_core::PatternMatcher;
///
/// let matcher = PatternMatcher::new("safe");
///
/// assert!(matcher.matches("prod-SAFE"));
/// assert!(!matcher.matches("main"));
/// assert!(!PatternMatcher::new("  ").matches("main"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMatcher {
    pattern: String,
    normalized: String,
}

impl PatternMatcher {
    /// Creates a matcher for the given pattern.
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let normalized = pattern.to_lowercase();
        Self {
            pattern,
            normalized,
        }
    }

    /// Returns the pattern as configured.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns `true` when the pattern can never match.
    pub fn is_blank(&self) -> bool {
        self.pattern.trim().is_empty()
    }

    /// Returns `true` iff the lower-cased pattern is a substring of the lower-cased name.
    pub fn matches(&self, branch_name: &str) -> bool {
        if self.is_blank() {
            return false;
        }

        branch_name.to_lowercase().contains(&self.normalized)
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_SAFE_BRANCH_PATTERN)
    }
}
