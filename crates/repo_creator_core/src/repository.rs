//! Repository domain types
//!
//! Validated names for the things the tool addresses on GitHub: repositories, their owners
//! and branches. Validation happens before any network call so that obviously invalid
//! input never reaches GitHub.

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;

/// Validated GitHub repository name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Create a new repository name with validation
    ///
    /// # Validation Rules
    /// - Length: 1-100 characters
    /// - Characters: ASCII alphanumeric, hyphens, underscores, periods
    /// - Must not start with `.` or `-`
    ///
    /// # Errors
    /// Returns `ValidationError` if validation fails
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();

        if name.is_empty() {
            return Err(ValidationError::empty_field("repository_name"));
        }

        if name.len() > 100 {
            return Err(ValidationError::too_long(
                "repository_name",
                name.len(),
                100,
            ));
        }

        if name.starts_with('.') || name.starts_with('-') {
            return Err(ValidationError::invalid_format(
                "repository_name",
                "must not start with '.' or '-'",
            ));
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            return Err(ValidationError::invalid_format(
                "repository_name",
                "must contain only alphanumeric characters, hyphens, underscores, or periods",
            ));
        }

        Ok(Self(name))
    }

    /// Get the repository name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RepositoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated GitHub user or organization name owning a repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerName(String);

impl OwnerName {
    /// Create a new owner name with validation
    ///
    /// # Validation Rules
    /// - Length: 1-39 characters
    /// - Characters: ASCII alphanumeric and hyphens only
    /// - Must not start or end with hyphen
    ///
    /// # Errors
    /// Returns `ValidationError` if validation fails
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();

        if name.is_empty() {
            return Err(ValidationError::empty_field("owner_name"));
        }

        if name.len() > 39 {
            return Err(ValidationError::too_long("owner_name", name.len(), 39));
        }

        if name.starts_with('-') || name.ends_with('-') {
            return Err(ValidationError::invalid_format(
                "owner_name",
                "must not start or end with hyphen",
            ));
        }

        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ValidationError::invalid_format(
                "owner_name",
                "must contain only alphanumeric characters and hyphens",
            ));
        }

        Ok(Self(name))
    }

    /// Get the owner name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OwnerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated git branch name
///
/// Applies the subset of `git check-ref-format` rules that GitHub enforces when a branch is
/// created through the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchName(String);

impl BranchName {
    /// Create a new branch name with validation
    ///
    /// # Errors
    /// Returns `ValidationError` if validation fails
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();

        if name.is_empty() {
            return Err(ValidationError::empty_field("branch_name"));
        }

        if name.len() > 255 {
            return Err(ValidationError::too_long("branch_name", name.len(), 255));
        }

        if name.starts_with('-') || name.starts_with('/') || name.ends_with('/') {
            return Err(ValidationError::invalid_format(
                "branch_name",
                "must not start with '-' or '/' or end with '/'",
            ));
        }

        if name.ends_with('.') || name.ends_with(".lock") {
            return Err(ValidationError::invalid_format(
                "branch_name",
                "must not end with '.' or '.lock'",
            ));
        }

        if name.contains("..") || name.contains("//") || name.contains("@{") {
            return Err(ValidationError::invalid_format(
                "branch_name",
                "must not contain '..', '//' or '@{'",
            ));
        }

        if name
            .chars()
            .any(|c| c.is_control() || c.is_whitespace() || "~^:?*[\\".contains(c))
        {
            return Err(ValidationError::invalid_format(
                "branch_name",
                "must not contain whitespace, control characters or any of ~^:?*[\\",
            ));
        }

        Ok(Self(name))
    }

    /// Get the branch name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
