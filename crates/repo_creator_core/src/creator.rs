//! Repository creation orchestration.
//!
//! [`RepositoryCreator`] ties the pieces together: it writes the initial files, creates the
//! repository on GitHub, publishes the local content, protects the default branch,
//! optionally seeds an empty safe branch and finally runs the
//! [`BranchProtectionReconciler`] over the new repository.
//!
//! Steps after the push are best-effort. Their failures are recorded in the
//! [`CreationResult`] as warnings because the repository already exists at that point.

use std::path::{Path, PathBuf};

use github_client::{
    Branch, BranchClient, Repository, RepositoryClient, RepositoryCreatePayload, User,
    EMPTY_TREE_SHA,
};
use tracing::{error, info, instrument, warn};

use crate::{
    count_files, BranchName, BranchOutcome, BranchProtectionReconciler, ContentPublisher,
    FileSet, GitHubError, OwnerName, PatternMatcher, ProtectionPolicy, PublishOutcome,
    ReconciliationReport, RepoCreatorError, RepoCreatorResult, RepositoryName, SystemError,
    DEFAULT_BRANCH,
};

#[cfg(test)]
#[path = "creator_tests.rs"]
mod tests;

/// Description given to repositories when neither the request nor the configuration
/// provides one.
pub const DEFAULT_DESCRIPTION: &str = "Created with GitHub Repo Creator";

/// Name of the empty branch seeded into every new repository unless the request opts out.
pub const DEFAULT_SAFE_BRANCH: &str = "safe";

/// Message of the commit that seeds an empty safe branch.
pub const EMPTY_BRANCH_COMMIT_MESSAGE: &str = "Empty safe branch - all files removed";

/// Number of repositories listed by [`RepositoryCreator::check_connection`].
const RECENT_REPOSITORY_COUNT: u8 = 5;

/// Settings shared by every operation of a [`RepositoryCreator`].
#[derive(Debug, Clone)]
pub struct CreatorSettings {
    /// Account that owns the repositories. The authenticated user when `None`.
    pub owner: Option<OwnerName>,
    /// Description used when a request does not carry one.
    pub default_description: String,
    pub matcher: PatternMatcher,
    pub policy: ProtectionPolicy,
}

impl Default for CreatorSettings {
    fn default() -> Self {
        Self {
            owner: None,
            default_description: DEFAULT_DESCRIPTION.to_string(),
            matcher: PatternMatcher::default(),
            policy: ProtectionPolicy::default(),
        }
    }
}

/// Request to create a repository from a set of files.
#[derive(Debug, Clone)]
pub struct CreateRepositoryRequest {
    pub name: RepositoryName,
    pub description: Option<String>,
    pub private: bool,
    /// Directory the files are written to before being pushed.
    pub local_path: PathBuf,
    /// Files to write. The default README and `.gitignore` when `None`.
    pub files: Option<FileSet>,
    /// Name of an empty branch to create after the push. `None` skips seeding.
    pub safe_branch: Option<BranchName>,
}

impl CreateRepositoryRequest {
    /// Public repository with the default files, the default description and an empty
    /// [`DEFAULT_SAFE_BRANCH`].
    pub fn new(name: RepositoryName, local_path: impl Into<PathBuf>) -> Self {
        Self {
            name,
            description: None,
            private: false,
            local_path: local_path.into(),
            files: None,
            safe_branch: default_safe_branch(),
        }
    }
}

/// Request to create a repository from an existing directory.
#[derive(Debug, Clone)]
pub struct TemplateRepositoryRequest {
    pub name: RepositoryName,
    pub description: Option<String>,
    pub private: bool,
    pub template_path: PathBuf,
    pub safe_branch: Option<BranchName>,
}

impl TemplateRepositoryRequest {
    /// Public repository pushed from `template_path` with an empty [`DEFAULT_SAFE_BRANCH`].
    pub fn new(name: RepositoryName, template_path: impl Into<PathBuf>) -> Self {
        Self {
            name,
            description: None,
            private: false,
            template_path: template_path.into(),
            safe_branch: default_safe_branch(),
        }
    }
}

fn default_safe_branch() -> Option<BranchName> {
    BranchName::new(DEFAULT_SAFE_BRANCH).ok()
}

/// What happened to the optional safe branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SafeBranchOutcome {
    Created { name: String, sha: String },
    Failed { name: String, reason: String },
}

/// Result of creating and publishing a repository.
#[derive(Debug, Clone)]
pub struct CreationResult {
    pub repository: Repository,
    /// Directory that was pushed
    pub local_path: PathBuf,
    /// Number of files in the pushed directory, `.git` excluded
    pub file_count: usize,
    pub publish: PublishOutcome,
    /// `NewlyProtected` or `Failed`
    pub default_branch_protection: BranchOutcome,
    pub safe_branch: Option<SafeBranchOutcome>,
    /// `None` when the branches of the new repository could not be listed
    pub reconciliation: Option<ReconciliationReport>,
    /// Non-fatal problems met after the push
    pub warnings: Vec<String>,
}

impl CreationResult {
    /// Returns true if every step after the push succeeded.
    pub fn is_fully_protected(&self) -> bool {
        self.warnings.is_empty()
            && self
                .reconciliation
                .as_ref()
                .map(ReconciliationReport::is_success)
                .unwrap_or(false)
    }
}

/// Result of `create-branch`.
#[derive(Debug, Clone)]
pub struct BranchCreationResult {
    /// Owner the repository was resolved under
    pub owner: String,
    pub branch: String,
    pub source: String,
    pub sha: String,
    /// Outcome of checking the new branch against the pattern
    pub report: ReconciliationReport,
}

/// Result of the connection check.
#[derive(Debug, Clone)]
pub struct ConnectionReport {
    pub user: User,
    pub recent_repositories: Vec<Repository>,
}

/// Creates repositories and manages their branch protection.
pub struct RepositoryCreator<C, P> {
    client: C,
    publisher: P,
    settings: CreatorSettings,
}

impl<C, P> RepositoryCreator<C, P>
where
    C: RepositoryClient + BranchClient,
    P: ContentPublisher,
{
    pub fn new(client: C, publisher: P, settings: CreatorSettings) -> Self {
        Self {
            client,
            publisher,
            settings,
        }
    }

    pub fn settings(&self) -> &CreatorSettings {
        &self.settings
    }

    /// Returns a reconciler using this creator's client, pattern and policy.
    fn reconciler(&self) -> BranchProtectionReconciler<'_, C> {
        BranchProtectionReconciler::new(
            &self.client,
            self.settings.matcher.clone(),
            &self.settings.policy,
        )
    }

    /// Returns the configured owner, or the login of the authenticated user.
    #[instrument(skip(self))]
    pub async fn resolve_owner(&self) -> RepoCreatorResult<String> {
        if let Some(owner) = &self.settings.owner {
            return Ok(owner.to_string());
        }

        let user = self
            .client
            .get_authenticated_user()
            .await
            .map_err(|e| RepoCreatorError::from_github(e, "authenticated user"))?;
        info!(login = user.login, "Resolved owner from token");
        Ok(user.login)
    }

    /// Verifies the token and lists the most recently updated repositories.
    #[instrument(skip(self))]
    pub async fn check_connection(&self) -> RepoCreatorResult<ConnectionReport> {
        let user = self
            .client
            .get_authenticated_user()
            .await
            .map_err(|e| RepoCreatorError::from_github(e, "authenticated user"))?;

        let recent_repositories = self
            .client
            .list_user_repositories(RECENT_REPOSITORY_COUNT)
            .await
            .map_err(|e| RepoCreatorError::from_github(e, "user repositories"))?;

        Ok(ConnectionReport {
            user,
            recent_repositories,
        })
    }

    /// Writes the requested files, creates the repository and pushes the files to it.
    ///
    /// # Errors
    ///
    /// Fails when the files cannot be written, the repository cannot be created or the
    /// push fails. Problems after the push are reported in the returned result.
    #[instrument(skip(self, request), fields(repo = %request.name))]
    pub async fn create_with_files(
        &self,
        request: CreateRepositoryRequest,
    ) -> RepoCreatorResult<CreationResult> {
        let owner = self.resolve_owner().await?;

        let files = match request.files {
            Some(files) => files,
            None => FileSet::default_for(
                &request.name,
                request.description.as_deref().unwrap_or_default(),
            ),
        };
        files.write_to(&request.local_path)?;

        self.create_and_publish(
            &owner,
            &request.name,
            request.description.as_deref(),
            request.private,
            &request.local_path,
            request.safe_branch.as_ref(),
        )
        .await
    }

    /// Creates the repository and pushes an existing directory as-is.
    #[instrument(skip(self, request), fields(repo = %request.name))]
    pub async fn create_from_directory(
        &self,
        request: TemplateRepositoryRequest,
    ) -> RepoCreatorResult<CreationResult> {
        if !request.template_path.is_dir() {
            return Err(SystemError::PathNotFound {
                path: request.template_path.display().to_string(),
            }
            .into());
        }

        let owner = self.resolve_owner().await?;

        self.create_and_publish(
            &owner,
            &request.name,
            request.description.as_deref(),
            request.private,
            &request.template_path,
            request.safe_branch.as_ref(),
        )
        .await
    }

    async fn create_and_publish(
        &self,
        owner: &str,
        name: &RepositoryName,
        description: Option<&str>,
        private: bool,
        local_path: &Path,
        safe_branch: Option<&BranchName>,
    ) -> RepoCreatorResult<CreationResult> {
        let file_count = count_files(local_path)?;
        info!(file_count = file_count, "Publishing {:?}", local_path);

        let repository = self.create_repository(owner, name, description, private).await?;
        let owner = repository
            .full_name()
            .split_once('/')
            .map(|(owner, _)| owner)
            .unwrap_or(owner)
            .to_string();
        let owner = owner.as_str();

        let publish = self
            .publisher
            .publish(local_path, &repository.clone_url(), DEFAULT_BRANCH)
            .await?;
        info!(sha = publish.commit_sha, "Pushed initial content");

        let mut warnings = Vec::new();

        let default_branch_protection = self.protect_after_push(owner, name.as_str()).await;
        if let BranchOutcome::Failed { reason } = &default_branch_protection {
            warnings.push(format!(
                "Failed to protect branch '{}': {}",
                DEFAULT_BRANCH, reason
            ));
        }

        let safe_branch = match safe_branch {
            Some(branch) => {
                let outcome = self.seed_safe_branch(owner, name.as_str(), branch).await;
                if let SafeBranchOutcome::Failed { name, reason } = &outcome {
                    warnings.push(format!("Failed to create branch '{}': {}", name, reason));
                }
                Some(outcome)
            }
            None => None,
        };

        let reconciliation = match self.reconciler().reconcile(owner, name.as_str()).await {
            Ok(report) => Some(report),
            Err(e) => {
                warn!(error = %e, "Branch protection reconciliation failed");
                warnings.push(format!("Failed to reconcile branch protection: {}", e));
                None
            }
        };

        Ok(CreationResult {
            repository,
            local_path: local_path.to_path_buf(),
            file_count,
            publish,
            default_branch_protection,
            safe_branch,
            reconciliation,
            warnings,
        })
    }

    async fn create_repository(
        &self,
        owner: &str,
        name: &RepositoryName,
        description: Option<&str>,
        private: bool,
    ) -> RepoCreatorResult<Repository> {
        let description = description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(self.settings.default_description.as_str());

        let payload = RepositoryCreatePayload {
            name: name.to_string(),
            description: Some(description.to_string()),
            private: Some(private),
            ..Default::default()
        };

        match self.client.create_user_repository(&payload).await {
            Ok(repository) => {
                info!(
                    full_name = repository.full_name(),
                    private = repository.is_private(),
                    "Created repository"
                );
                Ok(repository)
            }
            Err(github_client::Error::RemoteError { status: 422, message })
                if message.contains("already exists") =>
            {
                error!(repo = %name, "Repository already exists");
                Err(GitHubError::RepositoryAlreadyExists {
                    name: name.to_string(),
                }
                .into())
            }
            Err(e) => Err(RepoCreatorError::from_github(e, format!("{}/{}", owner, name))),
        }
    }

    async fn protect_after_push(&self, owner: &str, repo: &str) -> BranchOutcome {
        match self
            .client
            .apply_branch_protection(
                owner,
                repo,
                DEFAULT_BRANCH,
                &self.settings.policy.to_payload(),
            )
            .await
        {
            Ok(()) => {
                info!(branch = DEFAULT_BRANCH, "Protected default branch");
                BranchOutcome::NewlyProtected
            }
            Err(e) => {
                warn!(branch = DEFAULT_BRANCH, error = ?e, "Failed to protect default branch");
                BranchOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn seed_safe_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &BranchName,
    ) -> SafeBranchOutcome {
        if !self.settings.matcher.matches(branch.as_str()) {
            warn!(
                branch = %branch,
                pattern = self.settings.matcher.pattern(),
                "Seeded branch does not match the safe branch pattern and will not be protected"
            );
        }

        match self.seed_empty_branch(owner, repo, branch, DEFAULT_BRANCH).await {
            Ok(sha) => SafeBranchOutcome::Created {
                name: branch.to_string(),
                sha,
            },
            Err(e) => SafeBranchOutcome::Failed {
                name: branch.to_string(),
                reason: e.to_string(),
            },
        }
    }

    /// Creates `branch` pointing at a commit whose tree is empty and whose parent is the tip
    /// of `from`. Returns the SHA of that commit.
    #[instrument(skip(self))]
    pub async fn seed_empty_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &BranchName,
        from: &str,
    ) -> RepoCreatorResult<String> {
        let source = self
            .client
            .get_branch(owner, repo, from)
            .await
            .map_err(|e| RepoCreatorError::from_github(e, format!("{}/{}@{}", owner, repo, from)))?;

        let commit = self
            .client
            .create_commit(
                owner,
                repo,
                EMPTY_BRANCH_COMMIT_MESSAGE,
                EMPTY_TREE_SHA,
                &[source.sha],
            )
            .await
            .map_err(|e| RepoCreatorError::from_github(e, format!("{}/{}", owner, repo)))?;

        self.client
            .create_branch(owner, repo, branch.as_str(), &commit.sha)
            .await
            .map_err(|e| RepoCreatorError::from_github(e, format!("{}/{}", owner, repo)))?;

        info!(branch = %branch, sha = commit.sha, "Created empty branch");
        Ok(commit.sha)
    }

    /// Creates `branch` from the tip of `from`, then checks it against the pattern.
    #[instrument(skip(self))]
    pub async fn create_branch(
        &self,
        repo: &RepositoryName,
        branch: &BranchName,
        from: &BranchName,
    ) -> RepoCreatorResult<BranchCreationResult> {
        let owner = self.resolve_owner().await?;

        let source = self
            .client
            .get_branch(&owner, repo.as_str(), from.as_str())
            .await
            .map_err(|e| RepoCreatorError::from_github(e, format!("{}/{}@{}", owner, repo, from)))?;

        self.client
            .create_branch(&owner, repo.as_str(), branch.as_str(), &source.sha)
            .await
            .map_err(|e| RepoCreatorError::from_github(e, format!("{}/{}", owner, repo)))?;
        info!(branch = %branch, from = %from, sha = source.sha, "Created branch");

        let created = Branch::new(branch.as_str(), source.sha.clone(), false);
        let report = self
            .reconciler()
            .reconcile_branches(&owner, repo.as_str(), std::slice::from_ref(&created))
            .await;

        Ok(BranchCreationResult {
            owner,
            branch: branch.to_string(),
            source: from.to_string(),
            sha: source.sha,
            report,
        })
    }

    /// Applies the policy to a single branch and returns the owner the repository was
    /// resolved under.
    ///
    /// Unlike the reconciler this ignores the pattern and the current protection state.
    #[instrument(skip(self))]
    pub async fn protect_branch(
        &self,
        repo: &RepositoryName,
        branch: &BranchName,
    ) -> RepoCreatorResult<String> {
        let owner = self.resolve_owner().await?;

        self.client
            .apply_branch_protection(
                &owner,
                repo.as_str(),
                branch.as_str(),
                &self.settings.policy.to_payload(),
            )
            .await
            .map_err(|e| {
                RepoCreatorError::from_github(e, format!("{}/{}@{}", owner, repo, branch))
            })?;

        info!(branch = %branch, "Branch protection applied");
        Ok(owner)
    }

    /// Runs the reconciler over every branch of `repo`.
    ///
    /// Returns the owner the repository was resolved under together with the report.
    #[instrument(skip(self))]
    pub async fn protect_safe_branches(
        &self,
        repo: &RepositoryName,
    ) -> RepoCreatorResult<(String, ReconciliationReport)> {
        let owner = self.resolve_owner().await?;
        let report = self.reconciler().reconcile(&owner, repo.as_str()).await?;
        Ok((owner, report))
    }
}
