//! Tests for error types

use super::*;

// ============================================================================
// ValidationError Tests
// ============================================================================

#[test]
fn test_validation_error_empty_field() {
    let err = ValidationError::empty_field("repository_name");

    assert_eq!(err.to_string(), "Field 'repository_name' cannot be empty");

    match err {
        ValidationError::EmptyField { field } => assert_eq!(field, "repository_name"),
        _ => panic!("Expected EmptyField variant"),
    }
}

#[test]
fn test_validation_error_too_long() {
    let err = ValidationError::too_long("name", 150, 100);

    assert_eq!(
        err.to_string(),
        "Field 'name' is too long: 150 characters (max: 100)"
    );
}

#[test]
fn test_validation_error_invalid_format() {
    let err = ValidationError::invalid_format("repository_name", "must not start with '.' or '-'");

    assert_eq!(
        err.to_string(),
        "Field 'repository_name' has invalid format: must not start with '.' or '-'"
    );
}

// ============================================================================
// GitHub error translation
// ============================================================================

#[test]
fn test_from_github_auth_error() {
    let err = RepoCreatorError::from_github(
        github_client::Error::AuthError("Bad credentials".to_string()),
        "user",
    );

    assert!(matches!(
        err,
        RepoCreatorError::Authentication(AuthenticationError::InvalidToken { ref reason })
            if reason == "Bad credentials"
    ));
    assert!(err.remediation_hint().is_some());
}

#[test]
fn test_from_github_not_found_names_resource() {
    let err = RepoCreatorError::from_github(github_client::Error::NotFound, "octocat/hello");

    assert_eq!(err.to_string(), "GitHub error: Resource not found: octocat/hello");
    assert!(err.remediation_hint().unwrap().contains("GITHUB_USERNAME"));
}

#[test]
fn test_from_github_remote_error_keeps_status() {
    let err = RepoCreatorError::from_github(
        github_client::Error::RemoteError {
            status: 403,
            message: "Forbidden".to_string(),
        },
        "octocat/hello",
    );

    assert_eq!(
        err.to_string(),
        "GitHub error: GitHub returned HTTP 403: Forbidden"
    );
    assert!(err.remediation_hint().is_none());
}

#[test]
fn test_from_github_rate_limit() {
    let err = RepoCreatorError::from_github(github_client::Error::RateLimitExceeded, "x");

    assert!(matches!(
        err,
        RepoCreatorError::GitHub(GitHubError::RateLimitExceeded)
    ));
}

#[test]
fn test_missing_configuration_has_setup_hint() {
    let err: RepoCreatorError = ConfigurationError::MissingValue {
        key: "GITHUB_TOKEN".to_string(),
    }
    .into();

    assert_eq!(
        err.to_string(),
        "Configuration error: GITHUB_TOKEN is required but was not set"
    );
    assert!(err.remediation_hint().unwrap().contains("setup"));
}

#[test]
fn test_git_error_display() {
    let err = GitError::PushFailed {
        remote: "origin".to_string(),
        reason: "authentication required".to_string(),
    };

    assert_eq!(
        err.to_string(),
        "Push to origin failed: authentication required"
    );
}

#[test]
fn test_system_error_io_includes_path() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err = SystemError::io("/tmp/files.json", &io_error);

    assert_eq!(err.to_string(), "I/O error on '/tmp/files.json': denied");
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RepoCreatorError>();
}
