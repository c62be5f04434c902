//! Error types for GitHub client operations.
//!
//! This module defines the error types that can occur when interacting with the GitHub API
//! through the github_client crate. Errors returned by octocrab are translated into these
//! variants by [`crate::map_octocrab_error`] so that callers can distinguish authentication
//! problems, missing resources and other remote failures without depending on octocrab.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitHub client operations.
///
/// ## Examples
///
/// ```rust,ignore
/// use github_client::Error;
///
/// match client.list_branches("octocat", "hello-world").await {
///     Ok(branches) => println!("Found {} branches", branches.len()),
///     Err(Error::AuthError(msg)) => eprintln!("Authentication failed: {}", msg),
///     Err(Error::NotFound) => eprintln!("Repository does not exist"),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A generic API request failure.
    ///
    /// Returned when the octocrab client cannot be built or a request fails before
    /// GitHub produced a response (connection refused, TLS failure and similar).
    #[error("API request failed")]
    ApiError(),

    /// Authentication failure.
    ///
    /// This error occurs when:
    /// - The personal access token is invalid, expired or revoked
    /// - GitHub answered with `401 Unauthorized`
    ///
    /// The contained string provides specific details about the authentication failure.
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// The GitHub API returned a response in an unexpected format.
    #[error("Invalid response format")]
    InvalidResponse,

    /// The requested resource was not found.
    ///
    /// GitHub answers `404` both for resources that do not exist and for resources the
    /// token is not allowed to see.
    #[error("Resource not found")]
    NotFound,

    /// GitHub API rate limit has been exceeded.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// GitHub rejected the request.
    ///
    /// Carries the HTTP status code and the message GitHub returned, e.g. a `403` when the
    /// token lacks admin rights on the repository, or a `422` when a protection rule
    /// conflicts with repository settings.
    #[error("GitHub returned HTTP {status}: {message}")]
    RemoteError { status: u16, message: String },
}

impl Error {
    /// Returns the HTTP status code associated with the error, when there is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::AuthError(_) => Some(401),
            Error::NotFound => Some(404),
            Error::RateLimitExceeded => Some(429),
            Error::RemoteError { status, .. } => Some(*status),
            Error::ApiError() | Error::InvalidResponse => None,
        }
    }
}
