//! Command modules for the repo-creator CLI.
//!
//! Each submodule handles one command:
//!
//! - `create_cmd`: create a repository from a file map or the default files
//! - `template_cmd`: create a repository from an existing directory
//! - `protect_cmd`: protect safe branches, or one named branch
//! - `branch_cmd`: create a branch and check it against the safe branch pattern
//! - `connection_cmd`: verify the token
//! - `setup_cmd`: write a `.env` file interactively

use std::path::{Path, PathBuf};

use github_client::{create_token_client, GitHubClient};
use repo_creator_core::{
    AuthenticationError, BranchName, GitPublisher, RepoCreatorError, RepositoryCreator,
    SystemError,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::error;

use crate::{config::AppConfig, errors::Error};

pub mod branch_cmd;
pub mod connection_cmd;
pub mod create_cmd;
pub mod protect_cmd;
pub mod setup_cmd;
pub mod template_cmd;

/// Creator wired to the GitHub API and libgit2.
pub type GitHubRepositoryCreator = RepositoryCreator<GitHubClient, GitPublisher>;

/// Builds a repository creator authenticated with the configured token.
pub fn build_creator(config: &AppConfig) -> Result<GitHubRepositoryCreator, Error> {
    let octocrab = create_token_client(config.token.expose_secret()).map_err(|e| {
        error!("Failed to create GitHub client: {}", e);
        RepoCreatorError::from(AuthenticationError::ClientCreationFailed)
    })?;

    let publisher = GitPublisher::new(SecretString::from(
        config.token.expose_secret().to_string(),
    ));

    Ok(RepositoryCreator::new(
        GitHubClient::new(octocrab),
        publisher,
        config.creator_settings(),
    ))
}

/// Resolves `path` against the current directory.
pub fn absolute_path(path: &Path) -> Result<PathBuf, Error> {
    std::path::absolute(path)
        .map_err(|e| RepoCreatorError::from(SystemError::io(path, &e)).into())
}

/// Validates the `--safe-branch` value. `None` when `--no-safe-branch` was given.
pub fn safe_branch_arg(name: &str, disabled: bool) -> Result<Option<BranchName>, Error> {
    if disabled {
        return Ok(None);
    }
    Ok(Some(BranchName::new(name)?))
}
