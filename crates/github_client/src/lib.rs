//! Crate for interacting with the GitHub REST API.
//!
//! This crate provides a client for making requests to GitHub authenticated with a personal
//! access token. It exposes the operations the repository creator needs through two traits:
//!
//! - [`RepositoryClient`] for account and repository level calls (who am I, create a
//!   repository, look one up)
//! - [`BranchClient`] for branch listing, branch creation and branch protection
//!
//! Splitting the surface this way keeps the branch protection reconciler independent of
//! repository creation, so it can be driven by a small test double.

use async_trait::async_trait;
use octocrab::{Octocrab, Result as OctocrabResult};
use serde::Serialize;
use tracing::{debug, error, info, instrument};

pub mod errors;
pub use errors::Error;

pub mod models;
pub use models::{Branch, GitCommit, GitReference, Repository, User};

pub mod branch_protection;
pub use branch_protection::{
    BranchProtectionPayload, PushRestrictions, RequiredPullRequestReviews, RequiredStatusChecks,
};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// SHA of the tree object that contains no entries. Git knows this object without it being
/// stored, which makes it usable as the tree of a commit that removes every file.
pub const EMPTY_TREE_SHA: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// Number of branches requested per page when listing branches. This is GitHub's maximum.
const BRANCHES_PER_PAGE: u8 = 100;

/// A client for interacting with the GitHub API, authenticated with a personal access token.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Octocrab,
}

impl GitHubClient {
    /// Creates a new `GitHubClient` from an authenticated `Octocrab` instance.
    ///
    /// Use [`create_token_client`] to build the `Octocrab` instance from a personal access
    /// token.
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RepositoryClient for GitHubClient {
    #[instrument(skip(self))]
    async fn get_authenticated_user(&self) -> Result<User, Error> {
        let response: OctocrabResult<User> = self.client.get("/user", None::<&()>).await;
        match response {
            Ok(user) => {
                debug!(login = user.login, "Retrieved authenticated user");
                Ok(user)
            }
            Err(e) => Err(map_octocrab_error("Failed to get the authenticated user", e)),
        }
    }

    #[instrument(skip(self))]
    async fn list_user_repositories(&self, limit: u8) -> Result<Vec<Repository>, Error> {
        let query = RepositoryListQuery {
            sort: "updated",
            per_page: limit,
        };
        let response: OctocrabResult<Vec<Repository>> =
            self.client.get("/user/repos", Some(&query)).await;
        match response {
            Ok(repositories) => Ok(repositories),
            Err(e) => Err(map_octocrab_error("Failed to list user repositories", e)),
        }
    }

    /// Creates a new repository for the authenticated user using the REST API directly.
    ///
    /// # Errors
    /// Returns `Error::RemoteError` with status `422` when a repository with the same name
    /// already exists.
    #[instrument(skip(self, payload), fields(name = %payload.name))]
    async fn create_user_repository(
        &self,
        payload: &RepositoryCreatePayload,
    ) -> Result<Repository, Error> {
        let response: OctocrabResult<Repository> =
            self.client.post("/user/repos", Some(payload)).await;
        match response {
            Ok(r) => {
                info!(full_name = r.full_name(), "Created repository");
                Ok(r)
            }
            Err(e) => Err(map_octocrab_error("Failed to create repository for user", e)),
        }
    }
}

#[async_trait]
impl BranchClient for GitHubClient {
    /// Lists all branches of a repository, following pagination until GitHub returns a
    /// short page.
    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn list_branches(&self, owner: &str, repo: &str) -> Result<Vec<Branch>, Error> {
        let path = format!("/repos/{}/{}/branches", owner, repo);
        let mut branches = Vec::new();
        let mut page: u32 = 1;

        loop {
            let query = PageQuery {
                per_page: BRANCHES_PER_PAGE,
                page,
            };
            let response: OctocrabResult<Vec<models::BranchResponse>> =
                self.client.get(&path, Some(&query)).await;
            let batch = response.map_err(|e| map_octocrab_error("Failed to list branches", e))?;

            let batch_len = batch.len();
            branches.extend(batch.into_iter().map(Branch::from));

            if batch_len < BRANCHES_PER_PAGE as usize {
                break;
            }
            page += 1;
        }

        debug!(count = branches.len(), "Listed branches");
        Ok(branches)
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, branch = %branch))]
    async fn get_branch(&self, owner: &str, repo: &str, branch: &str) -> Result<Branch, Error> {
        let path = format!(
            "/repos/{}/{}/branches/{}",
            owner,
            repo,
            encode_branch_name(branch)
        );
        let response: OctocrabResult<models::BranchResponse> =
            self.client.get(path, None::<&()>).await;
        match response {
            Ok(b) => Ok(Branch::from(b)),
            Err(e) => Err(map_octocrab_error("Failed to get branch", e)),
        }
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, branch = %branch))]
    async fn create_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        sha: &str,
    ) -> Result<GitReference, Error> {
        let path = format!("/repos/{}/{}/git/refs", owner, repo);
        let body = CreateReferencePayload {
            reference: format!("refs/heads/{}", branch),
            sha: sha.to_string(),
        };
        let response: OctocrabResult<GitReference> = self.client.post(path, Some(&body)).await;
        match response {
            Ok(r) => {
                info!(reference = r.reference, sha = r.object.sha, "Created branch");
                Ok(r)
            }
            Err(e) => Err(map_octocrab_error("Failed to create branch", e)),
        }
    }

    #[instrument(skip(self, message), fields(owner = %owner, repo = %repo, tree = %tree_sha))]
    async fn create_commit(
        &self,
        owner: &str,
        repo: &str,
        message: &str,
        tree_sha: &str,
        parents: &[String],
    ) -> Result<GitCommit, Error> {
        let path = format!("/repos/{}/{}/git/commits", owner, repo);
        let body = CreateCommitPayload {
            message: message.to_string(),
            tree: tree_sha.to_string(),
            parents: parents.to_vec(),
        };
        let response: OctocrabResult<GitCommit> = self.client.post(path, Some(&body)).await;
        match response {
            Ok(c) => Ok(c),
            Err(e) => Err(map_octocrab_error("Failed to create commit", e)),
        }
    }

    /// Creates or replaces the protection rules of a branch.
    ///
    /// GitHub treats this call as an upsert, so applying the same payload twice is harmless.
    #[instrument(skip(self, payload), fields(owner = %owner, repo = %repo, branch = %branch))]
    async fn apply_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        payload: &BranchProtectionPayload,
    ) -> Result<(), Error> {
        let path = format!(
            "/repos/{}/{}/branches/{}/protection",
            owner,
            repo,
            encode_branch_name(branch)
        );
        let response: OctocrabResult<serde_json::Value> =
            self.client.put(path, Some(payload)).await;
        match response {
            Ok(_) => {
                info!("Applied branch protection");
                Ok(())
            }
            Err(e) => Err(map_octocrab_error("Failed to apply branch protection", e)),
        }
    }
}

/// Represents the payload for creating a new repository via the REST API.
/// Use `Default::default()` and modify fields as needed.
#[derive(Serialize, Default, Debug, Clone)]
pub struct RepositoryCreatePayload {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>, // Defaults to false if None

    /// Create an initial commit with an empty README. Must stay unset when local content
    /// is pushed afterwards, otherwise the push is rejected as non-fast-forward.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_init: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gitignore_template: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_template: Option<String>,
}

/// Trait for account and repository operations.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// Returns the user the token belongs to.
    ///
    /// # Errors
    ///
    /// Returns `Error::AuthError` if the token is rejected.
    async fn get_authenticated_user(&self) -> Result<User, Error>;

    /// Lists the most recently updated repositories of the authenticated user.
    async fn list_user_repositories(&self, limit: u8) -> Result<Vec<Repository>, Error>;

    /// Creates a repository owned by the authenticated user.
    async fn create_user_repository(
        &self,
        payload: &RepositoryCreatePayload,
    ) -> Result<Repository, Error>;
}

/// Trait for branch operations.
///
/// This is the host-side collaborator of the branch protection reconciler. Implementations
/// carry any resilience (backoff, caching); callers do not retry.
#[async_trait]
pub trait BranchClient: Send + Sync {
    /// Lists every branch in the repository in the order GitHub returns them.
    ///
    /// # Errors
    ///
    /// Returns `Error::AuthError` for a rejected token and `Error::NotFound` for an unknown
    /// repository.
    async fn list_branches(&self, owner: &str, repo: &str) -> Result<Vec<Branch>, Error>;

    /// Fetches a single branch.
    async fn get_branch(&self, owner: &str, repo: &str, branch: &str) -> Result<Branch, Error>;

    /// Creates `refs/heads/<branch>` pointing at `sha`.
    async fn create_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        sha: &str,
    ) -> Result<GitReference, Error>;

    /// Creates a commit object with the given tree and parents. No reference is moved.
    async fn create_commit(
        &self,
        owner: &str,
        repo: &str,
        message: &str,
        tree_sha: &str,
        parents: &[String],
    ) -> Result<GitCommit, Error>;

    /// Applies protection rules to a branch.
    ///
    /// # Errors
    ///
    /// Returns `Error::RemoteError` with the HTTP status and GitHub's message when the
    /// request is rejected.
    async fn apply_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        payload: &BranchProtectionPayload,
    ) -> Result<(), Error>;
}

#[derive(Serialize)]
struct PageQuery {
    per_page: u8,
    page: u32,
}

#[derive(Serialize)]
struct RepositoryListQuery {
    sort: &'static str,
    per_page: u8,
}

#[derive(Serialize)]
struct CreateReferencePayload {
    #[serde(rename = "ref")]
    reference: String,
    sha: String,
}

#[derive(Serialize)]
struct CreateCommitPayload {
    message: String,
    tree: String,
    parents: Vec<String>,
}

/// Creates an `Octocrab` client authenticated with a personal access token.
///
/// # Errors
///
/// Returns `Error::ApiError` if the client cannot be built.
///
/// # Example
///
/// ```rust,no_run
/// use github_client::{create_token_client, GitHubClient};
///
/// let octocrab = create_token_client("ghp_example").unwrap();
/// let client = GitHubClient::new(octocrab);
/// ```
#[instrument(skip(token))]
pub fn create_token_client(token: &str) -> Result<Octocrab, Error> {
    Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .map_err(|e| {
            error!(error = ?e, "Failed to build Octocrab client with personal access token");
            Error::ApiError()
        })
}

/// Percent-encodes each `/`-separated segment of a branch name for use in a URL path.
fn encode_branch_name(branch: &str) -> String {
    branch
        .split('/')
        .map(|segment| {
            url::form_urlencoded::byte_serialize(segment.as_bytes())
                .collect::<String>()
                .replace('+', "%20")
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Joins the top level message of a GitHub error with the messages of its `errors` entries.
///
/// Validation failures carry the useful detail in the entries, e.g. `Repository creation
/// failed.` followed by `name already exists on this account`.
fn remote_error_message(source: &octocrab::GitHubError) -> String {
    let details: Vec<&str> = source
        .errors
        .iter()
        .flatten()
        .filter_map(|entry| entry.get("message").and_then(|m| m.as_str()))
        .collect();

    if details.is_empty() {
        source.message.clone()
    } else {
        format!("{} ({})", source.message, details.join("; "))
    }
}

/// Logs an octocrab error and translates it into an [`Error`].
///
/// Status codes are mapped as follows:
/// - `401` becomes `Error::AuthError`
/// - `404` becomes `Error::NotFound`
/// - `429`, and `403` responses whose message mentions the rate limit, become
///   `Error::RateLimitExceeded`
/// - any other GitHub response becomes `Error::RemoteError`
/// - transport level failures become `Error::ApiError`
pub(crate) fn map_octocrab_error(message: &str, e: octocrab::Error) -> Error {
    match e {
        octocrab::Error::GitHub { source, backtrace } => {
            let status = source.status_code;
            error!(
                status = status.as_u16(),
                error_message = source.message,
                backtrace = backtrace.to_string(),
                "{}. Received an error from GitHub",
                message
            );

            if status == http::StatusCode::UNAUTHORIZED {
                Error::AuthError(source.message.clone())
            } else if status == http::StatusCode::NOT_FOUND {
                Error::NotFound
            } else if status == http::StatusCode::TOO_MANY_REQUESTS
                || (status == http::StatusCode::FORBIDDEN
                    && source.message.to_lowercase().contains("rate limit"))
            {
                Error::RateLimitExceeded
            } else {
                Error::RemoteError {
                    status: status.as_u16(),
                    message: remote_error_message(&source),
                }
            }
        }
        octocrab::Error::Serde { source, .. } => {
            error!(
                error_message = source.to_string(),
                "{}. Failed to parse the response from GitHub.", message
            );
            Error::InvalidResponse
        }
        octocrab::Error::Json { source, .. } => {
            error!(
                error_message = source.to_string(),
                "{}. Failed to parse the response from GitHub.", message
            );
            Error::InvalidResponse
        }
        _ => {
            error!(error_message = e.to_string(), message);
            Error::ApiError()
        }
    }
}
