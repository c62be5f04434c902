//! Error types for the repository creator.
//!
//! Errors are grouped by the area they originate from. The top level
//! [`RepoCreatorError`] wraps each group so that callers can match on the category
//! (configuration, authentication, GitHub, git, ...) and decide whether an error is fatal.
//!
//! Per-branch protection failures are *not* represented here; the reconciler records them
//! in its report instead of returning an error.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Result type used throughout the crate.
pub type RepoCreatorResult<T> = Result<T, RepoCreatorError>;

/// Top level error for repository creator operations.
#[derive(Error, Debug)]
pub enum RepoCreatorError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    #[error("GitHub error: {0}")]
    GitHub(#[from] GitHubError),

    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("System error: {0}")]
    System(#[from] SystemError),
}

impl RepoCreatorError {
    /// Translates a GitHub client error, naming the resource that was being accessed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use repo_creator_core::RepoCreatorError;
    ///
    /// let err = RepoCreatorError::from_github(github_client::Error::NotFound, "octocat/hello");
    /// assert_eq!(err.to_string(), "GitHub error: Resource not found: octocat/hello");
    /// ```
    pub fn from_github(err: github_client::Error, resource: impl Into<String>) -> Self {
        let resource = resource.into();
        match err {
            github_client::Error::AuthError(reason) => {
                AuthenticationError::InvalidToken { reason }.into()
            }
            github_client::Error::NotFound => GitHubError::NotFound { resource }.into(),
            github_client::Error::RateLimitExceeded => GitHubError::RateLimitExceeded.into(),
            github_client::Error::RemoteError { status, message } => {
                GitHubError::Remote { status, message }.into()
            }
            github_client::Error::InvalidResponse => GitHubError::InvalidResponse {
                reason: format!("unexpected response while accessing {}", resource),
            }
            .into(),
            github_client::Error::ApiError() => GitHubError::Network {
                reason: format!("request for {} failed", resource),
            }
            .into(),
        }
    }

    /// Returns a hint telling the user how to fix the error, if one is known.
    pub fn remediation_hint(&self) -> Option<&'static str> {
        match self {
            RepoCreatorError::Configuration(ConfigurationError::MissingValue { .. }) => Some(
                "Run `repo-creator setup` or set the value in your .env file or environment.",
            ),
            RepoCreatorError::Authentication(_) => Some(
                "Check that GITHUB_TOKEN is a valid personal access token with the `repo` scope.",
            ),
            RepoCreatorError::GitHub(GitHubError::NotFound { .. }) => Some(
                "Check the repository name and GITHUB_USERNAME, and that the token can access \
                 the repository.",
            ),
            RepoCreatorError::GitHub(GitHubError::RepositoryAlreadyExists { .. }) => {
                Some("Choose a different repository name or delete the existing repository.")
            }
            RepoCreatorError::GitHub(GitHubError::RateLimitExceeded) => {
                Some("Wait for the rate limit window to reset and run the command again.")
            }
            _ => None,
        }
    }
}

/// Input validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' is too long: {actual} characters (max: {max})")]
    TooLong {
        field: String,
        actual: usize,
        max: usize,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        Self::EmptyField {
            field: field.into(),
        }
    }

    pub fn too_long(field: impl Into<String>, actual: usize, max: usize) -> Self {
        Self::TooLong {
            field: field.into(),
            actual,
            max,
        }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration errors. Always reported before any network call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("{key} is required but was not set")]
    MissingValue { key: String },

    #[error("{key} has an invalid value: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Authentication errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("GitHub rejected the token: {reason}")]
    InvalidToken { reason: String },

    #[error("Failed to create the GitHub client")]
    ClientCreationFailed,
}

/// Errors reported by GitHub.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GitHubError {
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Repository '{name}' already exists")]
    RepositoryAlreadyExists { name: String },

    #[error("GitHub API rate limit exceeded")]
    RateLimitExceeded,

    #[error("GitHub returned HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Invalid response from GitHub: {reason}")]
    InvalidResponse { reason: String },

    #[error("Network error: {reason}")]
    Network { reason: String },
}

/// Errors from local git operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GitError {
    #[error("Git {operation} failed: {reason}")]
    OperationFailed { operation: String, reason: String },

    #[error("Nothing to commit in {path}")]
    NothingToCommit { path: String },

    #[error("Push to {remote} failed: {reason}")]
    PushFailed { remote: String, reason: String },
}

impl GitError {
    pub fn operation(operation: impl Into<String>, err: &git2::Error) -> Self {
        Self::OperationFailed {
            operation: operation.into(),
            reason: err.message().to_string(),
        }
    }
}

/// Local system errors (file system access and similar).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SystemError {
    #[error("I/O error on '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("Path does not exist: {path}")]
    PathNotFound { path: String },

    #[error("Failed to parse '{path}': {reason}")]
    Parse { path: String, reason: String },

    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

impl SystemError {
    pub fn io(path: impl AsRef<std::path::Path>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            reason: err.to_string(),
        }
    }
}
