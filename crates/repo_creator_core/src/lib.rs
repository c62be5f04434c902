//! # Repo Creator Core
//!
//! This crate provides the domain logic of the GitHub repository creator: creating
//! repositories, publishing their initial content and keeping "safe" branches protected.
//!
//! ## Overview
//!
//! Creating a repository runs these steps:
//! 1. Write the initial files (a JSON file map or a default README and `.gitignore`)
//! 2. Create the repository through the GitHub API
//! 3. Commit the local directory and push it to `main`
//! 4. Protect `main` and optionally seed an empty safe branch
//! 5. Reconcile branch protection for every branch matching the safe branch pattern
//!
//! ## Branch protection
//!
//! The [`BranchProtectionReconciler`] lists the branches of a repository and protects every
//! branch whose name contains the configured pattern (case-insensitive). It never removes
//! protection, never retries, and reports the outcome of every branch in a
//! [`ReconciliationReport`] without stopping at the first failure.
//!
//! ## Examples
//!
//! ```no_run
//! use github_client::{create_token_client, GitHubClient};
//! use repo_creator_core::{
//!     CreatorSettings, GitPublisher, RepositoryCreator, RepositoryName,
//! };
//! use secrecy::SecretString;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let token = "ghp_example";
//! let client = GitHubClient::new(create_token_client(token)?);
//! let publisher = GitPublisher::new(SecretString::from(token.to_string()));
//! let creator = RepositoryCreator::new(client, publisher, CreatorSettings::default());
//!
//! let (_owner, report) = creator
//!     .protect_safe_branches(&RepositoryName::new("my-project")?)
//!     .await?;
//! println!("{} branches newly protected", report.newly_protected());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! GitHub access goes through the `RepositoryClient` and `BranchClient` traits of the
//! `github_client` crate, and git pushes through the [`ContentPublisher`] trait, so the
//! orchestration can be exercised with in-memory doubles.

pub mod creator;
pub use creator::{
    BranchCreationResult, ConnectionReport, CreateRepositoryRequest, CreationResult,
    CreatorSettings, RepositoryCreator, SafeBranchOutcome, TemplateRepositoryRequest,
    DEFAULT_DESCRIPTION, DEFAULT_SAFE_BRANCH, EMPTY_BRANCH_COMMIT_MESSAGE,
};

pub mod errors;
pub use errors::{
    AuthenticationError, ConfigurationError, GitError, GitHubError, RepoCreatorError,
    RepoCreatorResult, SystemError, ValidationError,
};

pub mod files;
pub use files::{count_files, FileSet};

pub mod git;
pub use git::{ContentPublisher, GitPublisher, PublishOutcome, DEFAULT_BRANCH};

pub mod pattern;
pub use pattern::{PatternMatcher, DEFAULT_SAFE_BRANCH_PATTERN};

pub mod policy;
pub use policy::ProtectionPolicy;

pub mod reconciler;
pub use reconciler::{
    BranchOutcome, BranchProtectionReconciler, BranchResult, ReconciliationReport,
};

pub mod repository;
pub use repository::{BranchName, OwnerName, RepositoryName};

#[cfg(test)]
mod test_support;
