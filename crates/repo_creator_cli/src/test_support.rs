//! Helpers shared by the command tests.
//!
//! Commands run against a [`GitHubClient`] pointed at a wiremock server, with git pushes
//! replaced by [`RecordingPublisher`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use github_client::GitHubClient;
use repo_creator_core::{
    ContentPublisher, GitError, OwnerName, PublishOutcome, RepoCreatorResult, RepositoryCreator,
};
use secrecy::SecretString;
use serde_json::json;
use tokio::sync::Mutex;
use wiremock::MockServer;

use crate::config::AppConfig;

pub const TEST_TOKEN: &str = "ghp_test_token";
pub const PUSHED_SHA: &str = "abc123def456";

/// Publisher that records its calls instead of pushing.
#[derive(Clone, Default)]
pub struct RecordingPublisher {
    calls: Arc<Mutex<Vec<(PathBuf, String, String)>>>,
    fail: bool,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// `(local_path, clone_url, branch)` of every publish call.
    pub async fn calls(&self) -> Vec<(PathBuf, String, String)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl ContentPublisher for RecordingPublisher {
    async fn publish(
        &self,
        local_path: &Path,
        clone_url: &str,
        branch: &str,
    ) -> RepoCreatorResult<PublishOutcome> {
        self.calls.lock().await.push((
            local_path.to_path_buf(),
            clone_url.to_string(),
            branch.to_string(),
        ));

        if self.fail {
            return Err(GitError::PushFailed {
                remote: clone_url.to_string(),
                reason: "authentication required".to_string(),
            }
            .into());
        }

        Ok(PublishOutcome {
            commit_sha: PUSHED_SHA.to_string(),
            committed: true,
        })
    }
}

pub fn test_config(username: Option<&str>, pattern: &str) -> AppConfig {
    AppConfig {
        token: SecretString::from(TEST_TOKEN.to_string()),
        username: username.map(|name| OwnerName::new(name).unwrap()),
        default_private: false,
        default_description: repo_creator_core::DEFAULT_DESCRIPTION.to_string(),
        safe_branch_pattern: pattern.to_string(),
    }
}

pub fn client_for(server: &MockServer) -> GitHubClient {
    let octocrab = octocrab::Octocrab::builder()
        .base_uri(server.uri())
        .unwrap()
        .personal_token(TEST_TOKEN.to_string())
        .build()
        .unwrap();
    GitHubClient::new(octocrab)
}

pub fn creator_for(
    server: &MockServer,
    config: &AppConfig,
    publisher: RecordingPublisher,
) -> RepositoryCreator<GitHubClient, RecordingPublisher> {
    RepositoryCreator::new(client_for(server), publisher, config.creator_settings())
}

pub fn branch_json(name: &str, sha: &str, protected: bool) -> serde_json::Value {
    json!({
        "name": name,
        "commit": {
            "sha": sha,
            "url": format!("https://api.github.com/repos/octocat/demo/commits/{sha}")
        },
        "protected": protected
    })
}

pub fn repository_json(owner: &str, name: &str, private: bool) -> serde_json::Value {
    json!({
        "id": 42,
        "node_id": "R_kgDOtest",
        "name": name,
        "full_name": format!("{owner}/{name}"),
        "private": private,
        "clone_url": format!("https://github.com/{owner}/{name}.git"),
        "html_url": format!("https://github.com/{owner}/{name}"),
        "default_branch": "main"
    })
}

pub fn error_json(message: &str) -> serde_json::Value {
    json!({
        "message": message,
        "documentation_url": "https://docs.github.com/rest"
    })
}
