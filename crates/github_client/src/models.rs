//! # Models
//!
//! This module contains the data models returned by the GitHub REST API endpoints that the
//! repository creator uses: the authenticated user, repositories, branches and commits.
//!
//! The models only carry the fields the tool needs. Unknown fields in GitHub responses are
//! ignored during deserialization.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// Represents a GitHub user account.
///
/// Returned by `GET /user`. The profile fields are optional because GitHub only fills them
/// in when the user made them public.
///
/// # Examples
///
/// ```rust
/// use github_client::models::User;
///
/// let user = User {
///     id: 12345,
///     login: "octocat".to_string(),
///     ..Default::default()
/// };
///
/// println!("User: {} (ID: {})", user.login, user.id);
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct User {
    /// The unique numeric ID of the user
    pub id: u64,
    /// The login name of the user
    pub login: String,
    /// Public email address, if any
    #[serde(default)]
    pub email: Option<String>,
    /// Company the user lists on their profile, if any
    #[serde(default)]
    pub company: Option<String>,
    /// Number of public repositories owned by the user
    #[serde(default)]
    pub public_repos: Option<u64>,
}

/// Represents a GitHub repository.
///
/// This struct contains essential information about a GitHub repository,
/// including its name, visibility and the URLs used to clone and browse it.
///
/// # Examples
///
/// ```rust
/// use github_client::models::Repository;
///
/// let repo = Repository::new(
///     "my-repo".to_string(),
///     "owner/my-repo".to_string(),
///     "MDEwOlJlcG9zaXRvcnkx".to_string(),
///     false
/// );
///
/// println!("Repository: {}", repo.name());
/// println!("Is private: {}", repo.is_private());
/// println!("Clone URL: {}", repo.clone_url());
/// ```
#[derive(Clone, Debug, Deserialize)]
pub struct Repository {
    /// The full name of the repository (owner/name)
    full_name: String,
    /// The name of the repository
    name: String,
    /// The GraphQL node ID of the repository
    #[serde(default)]
    node_id: String,
    /// Whether the repository is private
    #[serde(default)]
    private: bool,
    /// HTTPS clone URL
    #[serde(default)]
    clone_url: Option<String>,
    /// Browser URL
    #[serde(default)]
    html_url: Option<String>,
}

impl Repository {
    /// Creates a new Repository instance.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the repository
    /// * `full_name` - The full name including owner (owner/repo)
    /// * `node_id` - The GraphQL node ID
    /// * `private` - Whether the repository is private
    pub fn new(name: String, full_name: String, node_id: String, private: bool) -> Self {
        Self {
            full_name,
            name,
            node_id,
            private,
            clone_url: None,
            html_url: None,
        }
    }

    /// Returns whether the repository is private.
    pub fn is_private(&self) -> bool {
        self.private
    }

    /// Returns the name of the repository (without owner).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the full name of the repository (`owner/name`).
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns the GraphQL node ID of the repository.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Returns the HTTPS clone URL for the repository.
    ///
    /// Falls back to `https://github.com/<full_name>.git` when GitHub did not include the
    /// clone URL in the response.
    pub fn clone_url(&self) -> String {
        self.clone_url
            .clone()
            .unwrap_or_else(|| format!("https://github.com/{}.git", self.full_name))
    }

    /// Returns the URL of the repository page on github.com.
    pub fn html_url(&self) -> String {
        self.html_url
            .clone()
            .unwrap_or_else(|| format!("https://github.com/{}", self.full_name))
    }
}

/// A branch in a repository together with its protection state.
///
/// Identity is the branch name within a repository. Values are read from GitHub on every
/// reconciliation pass and are never cached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Branch {
    /// Name of the branch, without the `refs/heads/` prefix
    pub name: String,
    /// SHA of the commit the branch points to
    pub sha: String,
    /// Whether GitHub reports the branch as protected
    pub is_protected: bool,
}

impl Branch {
    /// Creates a new branch value.
    pub fn new(name: impl Into<String>, sha: impl Into<String>, is_protected: bool) -> Self {
        Self {
            name: name.into(),
            sha: sha.into(),
            is_protected,
        }
    }
}

/// Wire format of an entry in `GET /repos/{owner}/{repo}/branches`.
#[derive(Debug, Deserialize)]
pub(crate) struct BranchResponse {
    pub name: String,
    pub commit: CommitReference,
    #[serde(default)]
    pub protected: bool,
}

impl From<BranchResponse> for Branch {
    fn from(value: BranchResponse) -> Self {
        Self {
            name: value.name,
            sha: value.commit.sha,
            is_protected: value.protected,
        }
    }
}

/// A reference to a commit as embedded in other GitHub responses.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CommitReference {
    /// SHA of the commit
    pub sha: String,
}

/// A git commit created through the Git Data API.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GitCommit {
    /// SHA of the new commit
    pub sha: String,
    /// Commit message
    #[serde(default)]
    pub message: String,
}

/// A git reference (`refs/heads/...`) created through the Git Data API.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GitReference {
    /// Fully qualified reference name, e.g. `refs/heads/safe`
    #[serde(rename = "ref")]
    pub reference: String,
    /// Object the reference points to
    pub object: CommitReference,
}
