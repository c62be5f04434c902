//! Local Git repository operations.
//!
//! This module covers the little git plumbing the tool needs:
//! - Initializing a repository in the local directory (or reusing an existing one)
//! - Staging everything and committing it
//! - Pointing `origin` at the new GitHub repository
//! - Pushing one branch with token authentication
//!
//! The git2 calls are blocking, so [`GitPublisher`] runs them on tokio's blocking pool.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use git2::{Repository, Signature};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, info, instrument, warn};

use crate::{GitError, RepoCreatorResult, SystemError};

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;

/// Branch the initial content is committed to and pushed as.
pub const DEFAULT_BRANCH: &str = "main";

/// Message of the commit created from the local directory.
pub const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

const FALLBACK_AUTHOR_NAME: &str = "repo-creator";
const FALLBACK_AUTHOR_EMAIL: &str = "repo-creator@users.noreply.github.com";

/// Publishes the contents of a local directory to a remote repository.
///
/// The repository creator depends on this trait instead of git2 directly so that the
/// orchestration can be tested without a network.
#[async_trait]
pub trait ContentPublisher: Send + Sync {
    /// Commits everything in `local_path` and pushes it to `branch` at `clone_url`.
    async fn publish(
        &self,
        local_path: &Path,
        clone_url: &str,
        branch: &str,
    ) -> RepoCreatorResult<PublishOutcome>;
}

/// What [`ContentPublisher::publish`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    /// SHA of the commit at the tip of the pushed branch
    pub commit_sha: String,
    /// Whether a new commit was created (false when the working tree was already committed)
    pub committed: bool,
}

/// [`ContentPublisher`] backed by libgit2, authenticating pushes with a personal access
/// token.
pub struct GitPublisher {
    token: SecretString,
}

impl GitPublisher {
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

#[async_trait]
impl ContentPublisher for GitPublisher {
    #[instrument(skip(self))]
    async fn publish(
        &self,
        local_path: &Path,
        clone_url: &str,
        branch: &str,
    ) -> RepoCreatorResult<PublishOutcome> {
        let path: PathBuf = local_path.to_path_buf();
        let url = clone_url.to_string();
        let branch = branch.to_string();
        let token = SecretString::from(self.token.expose_secret().to_string());

        let result = tokio::task::spawn_blocking(move || -> Result<PublishOutcome, GitError> {
            let repo = open_or_init(&path, &branch)?;
            let (commit_sha, committed) = match commit_all_changes(&repo, INITIAL_COMMIT_MESSAGE)? {
                Some(oid) => (oid.to_string(), true),
                None => (head_commit_sha(&repo)?, false),
            };
            set_origin(&repo, &url)?;
            push_to_origin(&repo, &branch, &token)?;
            Ok(PublishOutcome {
                commit_sha,
                committed,
            })
        })
        .await
        .map_err(|e| SystemError::Internal {
            reason: format!("git task failed: {}", e),
        })?;

        Ok(result?)
    }
}

/// Opens the repository at `path`, or initializes one whose HEAD points at `branch`.
pub fn open_or_init(path: &Path, branch: &str) -> Result<Repository, GitError> {
    if path.join(".git").exists() {
        debug!("Opening existing git repository at {:?}", path);
        return Repository::open(path).map_err(|e| GitError::operation("open", &e));
    }

    debug!("Initializing git repository at {:?}", path);
    let mut opts = git2::RepositoryInitOptions::new();
    opts.initial_head(&format!("refs/heads/{}", branch));

    let repo = Repository::init_opts(path, &opts).map_err(|e| {
        error!("Failed to initialize git repository: {}", e);
        GitError::operation("init", &e)
    })?;

    info!("Git repository initialized with '{}' as default branch", branch);
    Ok(repo)
}

/// Stages every file in the working directory and commits it on the current branch.
///
/// Returns `Ok(None)` when HEAD already points at a commit with the same tree. Files
/// matched by `.gitignore` are not staged.
///
/// # Errors
///
/// Returns `GitError::NothingToCommit` when the repository has no commits and the working
/// directory has nothing to stage.
pub fn commit_all_changes(repo: &Repository, message: &str) -> Result<Option<git2::Oid>, GitError> {
    let mut index = repo.index().map_err(|e| GitError::operation("index", &e))?;
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .map_err(|e| {
            error!("Failed to add files to index: {}", e);
            GitError::operation("add", &e)
        })?;
    index.write().map_err(|e| GitError::operation("index write", &e))?;

    info!("Added {} entries to git index", index.len());

    let tree_oid = index
        .write_tree()
        .map_err(|e| GitError::operation("write tree", &e))?;
    let tree = repo
        .find_tree(tree_oid)
        .map_err(|e| GitError::operation("find tree", &e))?;

    let parent = match repo.head() {
        Ok(head) => Some(
            head.peel_to_commit()
                .map_err(|e| GitError::operation("resolve HEAD", &e))?,
        ),
        Err(e)
            if e.code() == git2::ErrorCode::UnbornBranch
                || e.code() == git2::ErrorCode::NotFound =>
        {
            None
        }
        Err(e) => return Err(GitError::operation("resolve HEAD", &e)),
    };

    match &parent {
        Some(parent) if parent.tree_id() == tree_oid => {
            debug!("Working tree matches HEAD, nothing new to commit");
            return Ok(None);
        }
        None if index.is_empty() => {
            return Err(GitError::NothingToCommit {
                path: workdir_display(repo),
            });
        }
        _ => {}
    }

    let signature = signature(repo)?;
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    let oid = repo
        .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .map_err(|e| {
            error!("Failed to create commit: {}", e);
            GitError::operation("commit", &e)
        })?;

    info!("Committed changes with OID: {} and message: '{}'", oid, message);
    Ok(Some(oid))
}

/// Points the `origin` remote at `url`, creating it if needed.
pub fn set_origin(repo: &Repository, url: &str) -> Result<(), GitError> {
    match repo.find_remote("origin") {
        Ok(_) => {
            debug!("Origin remote already exists, updating its URL");
            repo.remote_set_url("origin", url)
                .map_err(|e| GitError::operation("set remote URL", &e))?;
        }
        Err(_) => {
            repo.remote("origin", url)
                .map_err(|e| GitError::operation("add remote", &e))?;
        }
    }

    info!("Remote 'origin' set to {}", url);
    Ok(())
}

/// Pushes the current local branch to `branch` on `origin`.
///
/// Authenticates with `x-access-token` as user name and the token as password.
pub fn push_to_origin(
    repo: &Repository,
    branch: &str,
    token: &SecretString,
) -> Result<(), GitError> {
    let local_ref = repo
        .head()
        .map_err(|e| GitError::operation("resolve HEAD", &e))?
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("refs/heads/{}", branch));

    let mut remote = repo
        .find_remote("origin")
        .map_err(|e| GitError::operation("find remote", &e))?;
    let remote_url = remote.url().unwrap_or("origin").to_string();

    let mut callbacks = git2::RemoteCallbacks::new();
    let token = token.expose_secret().to_string();
    callbacks.credentials(move |_url, _username_from_url, allowed_types| {
        if allowed_types.contains(git2::CredentialType::USER_PASS_PLAINTEXT) {
            git2::Cred::userpass_plaintext("x-access-token", &token)
        } else {
            error!(
                "No supported credential types available. Allowed types: {:?}",
                allowed_types
            );
            Err(git2::Error::from_str(
                "No supported credential types for GitHub authentication",
            ))
        }
    });
    callbacks.push_update_reference(|refname, status| match status {
        Some(msg) => Err(git2::Error::from_str(&format!(
            "Push reference update failed for '{}': {}",
            refname, msg
        ))),
        None => {
            info!("Reference '{}' updated successfully", refname);
            Ok(())
        }
    });

    let mut push_options = git2::PushOptions::new();
    push_options.remote_callbacks(callbacks);

    let refspec = format!("{}:refs/heads/{}", local_ref, branch);
    info!("Pushing with refspec: {}", refspec);

    remote
        .push(&[&refspec], Some(&mut push_options))
        .map_err(|e| {
            error!(code = ?e.code(), class = ?e.class(), "Git push failed: {}", e.message());
            let reason = match e.class() {
                git2::ErrorClass::Net => format!(
                    "network error: {}. Check the connection and repository URL.",
                    e.message()
                ),
                git2::ErrorClass::Http => format!(
                    "HTTP error: {}. The token may lack permission to push.",
                    e.message()
                ),
                git2::ErrorClass::Callback => format!(
                    "authentication error: {}. The token may be invalid or expired.",
                    e.message()
                ),
                _ => e.message().to_string(),
            };
            GitError::PushFailed {
                remote: remote_url.clone(),
                reason,
            }
        })?;

    info!("Successfully pushed to origin: {}", remote_url);
    Ok(())
}

fn head_commit_sha(repo: &Repository) -> Result<String, GitError> {
    let commit = repo
        .head()
        .and_then(|head| head.peel_to_commit())
        .map_err(|e| GitError::operation("resolve HEAD", &e))?;
    Ok(commit.id().to_string())
}

/// Uses the user's git identity when configured.
fn signature(repo: &Repository) -> Result<Signature<'static>, GitError> {
    match repo.signature() {
        Ok(sig) => Ok(sig),
        Err(e) => {
            warn!("No git identity configured ({}), using fallback author", e.message());
            Signature::now(FALLBACK_AUTHOR_NAME, FALLBACK_AUTHOR_EMAIL)
                .map_err(|e| GitError::operation("signature", &e))
        }
    }
}

fn workdir_display(repo: &Repository) -> String {
    repo.workdir()
        .unwrap_or_else(|| repo.path())
        .display()
        .to_string()
}
