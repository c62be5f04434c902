//! In-memory GitHub double shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use github_client::{
    Branch, BranchClient, BranchProtectionPayload, Error as GitHubClientError, GitCommit,
    GitReference, Repository, RepositoryClient, RepositoryCreatePayload, User,
};
use tokio::sync::Mutex;

/// Builds an error value for a given HTTP status the same way the real client does.
pub(crate) fn error_for_status(status: u16) -> GitHubClientError {
    match status {
        401 => GitHubClientError::AuthError("Bad credentials".to_string()),
        404 => GitHubClientError::NotFound,
        429 => GitHubClientError::RateLimitExceeded,
        0 => GitHubClientError::ApiError(),
        _ => GitHubClientError::RemoteError {
            status,
            message: format!("request rejected with {status}"),
        },
    }
}

#[derive(Default)]
struct State {
    login: String,
    user_failure: Option<u16>,
    branches: Vec<Branch>,
    list_failure: Option<u16>,
    protection_failures: HashMap<String, u16>,
    fail_all_protection: Option<u16>,
    protection_calls: Vec<(String, BranchProtectionPayload)>,
    create_repo_failure: Option<(u16, String)>,
    created_repos: Vec<RepositoryCreatePayload>,
    created_refs: Vec<(String, String)>,
    commits: Vec<(String, String, Vec<String>)>,
    list_calls: usize,
}

/// Records every call and keeps branch protection state in memory.
#[derive(Clone, Default)]
pub(crate) struct MockGitHub {
    state: Arc<Mutex<State>>,
}

impl MockGitHub {
    pub(crate) fn new(login: &str) -> Self {
        let mock = Self::default();
        mock.state.try_lock().expect("fresh mock").login = login.to_string();
        mock
    }

    pub(crate) fn with_branches(login: &str, branches: &[(&str, bool)]) -> Self {
        let mock = Self::new(login);
        {
            let mut state = mock.state.try_lock().expect("fresh mock");
            state.branches = branches
                .iter()
                .enumerate()
                .map(|(i, (name, protected))| Branch::new(*name, format!("sha{i}"), *protected))
                .collect();
        }
        mock
    }

    pub(crate) async fn fail_user(&self, status: u16) {
        self.state.lock().await.user_failure = Some(status);
    }

    pub(crate) async fn fail_listing(&self, status: u16) {
        self.state.lock().await.list_failure = Some(status);
    }

    pub(crate) async fn fail_protection_for(&self, branch: &str, status: u16) {
        self.state
            .lock()
            .await
            .protection_failures
            .insert(branch.to_string(), status);
    }

    pub(crate) async fn fail_all_protection(&self, status: u16) {
        self.state.lock().await.fail_all_protection = Some(status);
    }

    pub(crate) async fn fail_repository_creation(&self, status: u16, message: &str) {
        self.state.lock().await.create_repo_failure = Some((status, message.to_string()));
    }

    pub(crate) async fn protection_calls(&self) -> Vec<String> {
        self.state
            .lock()
            .await
            .protection_calls
            .iter()
            .map(|(branch, _)| branch.clone())
            .collect()
    }

    pub(crate) async fn protection_payloads(&self) -> Vec<BranchProtectionPayload> {
        self.state
            .lock()
            .await
            .protection_calls
            .iter()
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    pub(crate) async fn created_repos(&self) -> Vec<RepositoryCreatePayload> {
        self.state.lock().await.created_repos.clone()
    }

    pub(crate) async fn created_refs(&self) -> Vec<(String, String)> {
        self.state.lock().await.created_refs.clone()
    }

    pub(crate) async fn commits(&self) -> Vec<(String, String, Vec<String>)> {
        self.state.lock().await.commits.clone()
    }

    pub(crate) async fn list_calls(&self) -> usize {
        self.state.lock().await.list_calls
    }

    pub(crate) async fn branches(&self) -> Vec<Branch> {
        self.state.lock().await.branches.clone()
    }
}

#[async_trait]
impl RepositoryClient for MockGitHub {
    async fn get_authenticated_user(&self) -> Result<User, GitHubClientError> {
        let state = self.state.lock().await;
        if let Some(status) = state.user_failure {
            return Err(error_for_status(status));
        }
        Ok(User {
            id: 1,
            login: state.login.clone(),
            ..Default::default()
        })
    }

    async fn list_user_repositories(
        &self,
        limit: u8,
    ) -> Result<Vec<Repository>, GitHubClientError> {
        let state = self.state.lock().await;
        Ok(state
            .created_repos
            .iter()
            .take(limit as usize)
            .map(|p| {
                Repository::new(
                    p.name.clone(),
                    format!("{}/{}", state.login, p.name),
                    String::new(),
                    p.private.unwrap_or(false),
                )
            })
            .collect())
    }

    async fn create_user_repository(
        &self,
        payload: &RepositoryCreatePayload,
    ) -> Result<Repository, GitHubClientError> {
        let mut state = self.state.lock().await;
        if let Some((status, message)) = state.create_repo_failure.clone() {
            return Err(GitHubClientError::RemoteError { status, message });
        }
        state.created_repos.push(payload.clone());
        let full_name = format!("{}/{}", state.login, payload.name);
        Ok(Repository::new(
            payload.name.clone(),
            full_name,
            "R_mock".to_string(),
            payload.private.unwrap_or(false),
        ))
    }
}

#[async_trait]
impl BranchClient for MockGitHub {
    async fn list_branches(
        &self,
        _owner: &str,
        _repo: &str,
    ) -> Result<Vec<Branch>, GitHubClientError> {
        let mut state = self.state.lock().await;
        state.list_calls += 1;
        if let Some(status) = state.list_failure {
            return Err(error_for_status(status));
        }
        Ok(state.branches.clone())
    }

    async fn get_branch(
        &self,
        _owner: &str,
        _repo: &str,
        branch: &str,
    ) -> Result<Branch, GitHubClientError> {
        let state = self.state.lock().await;
        state
            .branches
            .iter()
            .find(|b| b.name == branch)
            .cloned()
            .ok_or(GitHubClientError::NotFound)
    }

    async fn create_branch(
        &self,
        _owner: &str,
        _repo: &str,
        branch: &str,
        sha: &str,
    ) -> Result<GitReference, GitHubClientError> {
        let mut state = self.state.lock().await;
        if state.branches.iter().any(|b| b.name == branch) {
            return Err(GitHubClientError::RemoteError {
                status: 422,
                message: "Reference already exists".to_string(),
            });
        }
        state.created_refs.push((branch.to_string(), sha.to_string()));
        state.branches.push(Branch::new(branch, sha, false));
        Ok(GitReference {
            reference: format!("refs/heads/{branch}"),
            object: github_client::models::CommitReference {
                sha: sha.to_string(),
            },
        })
    }

    async fn create_commit(
        &self,
        _owner: &str,
        _repo: &str,
        message: &str,
        tree_sha: &str,
        parents: &[String],
    ) -> Result<GitCommit, GitHubClientError> {
        let mut state = self.state.lock().await;
        state
            .commits
            .push((message.to_string(), tree_sha.to_string(), parents.to_vec()));
        Ok(GitCommit {
            sha: format!("commit{}", state.commits.len()),
            message: message.to_string(),
        })
    }

    async fn apply_branch_protection(
        &self,
        _owner: &str,
        _repo: &str,
        branch: &str,
        payload: &BranchProtectionPayload,
    ) -> Result<(), GitHubClientError> {
        let mut state = self.state.lock().await;
        state
            .protection_calls
            .push((branch.to_string(), payload.clone()));

        if let Some(status) = state.fail_all_protection {
            return Err(error_for_status(status));
        }
        if let Some(status) = state.protection_failures.get(branch).copied() {
            return Err(error_for_status(status));
        }

        if let Some(existing) = state.branches.iter_mut().find(|b| b.name == branch) {
            existing.is_protected = true;
        }
        Ok(())
    }
}
