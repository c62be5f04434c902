//! Branch protection reconciliation.
//!
//! This module provides the [`BranchProtectionReconciler`] component which brings the
//! protection state of a repository's branches in line with the configured pattern and
//! policy.
//!
//! Reconciliation is additive: branches are only ever protected, never unprotected. Every
//! branch is handled independently, so a failure on one branch is recorded in the
//! [`ReconciliationReport`] and processing continues with the next one.

use github_client::{Branch, BranchClient};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{PatternMatcher, ProtectionPolicy, RepoCreatorError, RepoCreatorResult};

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;

/// Protects every branch whose name matches a pattern.
///
/// # Examples
///
/// ```rust,no_run
/// use github_client::{create_token_client, GitHubClient};
/// use repo_creator_core::{BranchProtectionReconciler, PatternMatcher, ProtectionPolicy};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GitHubClient::new(create_token_client("ghp_example")?);
/// let policy = ProtectionPolicy::default();
/// let reconciler = BranchProtectionReconciler::new(&client, PatternMatcher::new("safe"), &policy);
///
/// let report = reconciler.reconcile("octocat", "hello-world").await?;
/// println!(
///     "Protected: {}, already protected: {}, failed: {}",
///     report.newly_protected(),
///     report.already_protected(),
///     report.failed()
/// );
/// # Ok(())
/// # }
/// ```
pub struct BranchProtectionReconciler<'a, C: BranchClient + ?Sized> {
    client: &'a C,
    matcher: PatternMatcher,
    policy: &'a ProtectionPolicy,
}

impl<'a, C: BranchClient + ?Sized> BranchProtectionReconciler<'a, C> {
    /// Creates a new reconciler.
    pub fn new(client: &'a C, matcher: PatternMatcher, policy: &'a ProtectionPolicy) -> Self {
        Self {
            client,
            matcher,
            policy,
        }
    }

    /// Lists the branches of a repository and protects those matching the pattern.
    ///
    /// # Errors
    ///
    /// Returns an error only when the branch list cannot be fetched (unknown repository,
    /// rejected token). Failures while protecting individual branches are reported in the
    /// returned [`ReconciliationReport`].
    #[instrument(skip(self), fields(pattern = %self.matcher.pattern()))]
    pub async fn reconcile(
        &self,
        owner: &str,
        repo: &str,
    ) -> RepoCreatorResult<ReconciliationReport> {
        let branches = self
            .client
            .list_branches(owner, repo)
            .await
            .map_err(|e| RepoCreatorError::from_github(e, format!("{}/{}", owner, repo)))?;

        info!(
            owner = owner,
            repo = repo,
            branch_count = branches.len(),
            "Retrieved branches for reconciliation"
        );

        Ok(self.reconcile_branches(owner, repo, &branches).await)
    }

    /// Reconciles a caller-supplied set of branches.
    ///
    /// The report lists the branches in the order they were given.
    pub async fn reconcile_branches(
        &self,
        owner: &str,
        repo: &str,
        branches: &[Branch],
    ) -> ReconciliationReport {
        let mut report = ReconciliationReport::new();

        for branch in branches {
            let outcome = self.reconcile_branch(owner, repo, branch).await;
            report.push(branch.name.clone(), outcome);
        }

        info!(
            newly_protected = report.newly_protected(),
            already_protected = report.already_protected(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Branch protection reconciliation complete"
        );

        report
    }

    async fn reconcile_branch(&self, owner: &str, repo: &str, branch: &Branch) -> BranchOutcome {
        if !self.matcher.matches(&branch.name) {
            debug!(branch = branch.name, "Branch does not match pattern");
            return BranchOutcome::SkippedNoMatch;
        }

        if branch.is_protected {
            debug!(branch = branch.name, "Branch is already protected");
            return BranchOutcome::AlreadyProtected;
        }

        info!(branch = branch.name, "Applying protection");
        match self
            .client
            .apply_branch_protection(owner, repo, &branch.name, &self.policy.to_payload())
            .await
        {
            Ok(()) => {
                info!(branch = branch.name, "Branch protected successfully");
                BranchOutcome::NewlyProtected
            }
            Err(e) => {
                warn!(branch = branch.name, error = ?e, "Failed to protect branch");
                BranchOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Outcome of reconciling a single branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BranchOutcome {
    /// The branch matched and was already protected; nothing was sent to GitHub.
    AlreadyProtected,
    /// The branch matched and protection was applied during this run.
    NewlyProtected,
    /// The branch matched but GitHub rejected the protection request.
    Failed { reason: String },
    /// The branch name does not match the pattern.
    SkippedNoMatch,
}

/// Outcome for one branch, keyed by branch name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchResult {
    pub branch: String,
    #[serde(flatten)]
    pub outcome: BranchOutcome,
}

/// Aggregated result of a reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    /// Per-branch outcomes in processing order
    results: Vec<BranchResult>,
}

impl ReconciliationReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
        }
    }

    /// Appends the outcome for a branch.
    pub fn push(&mut self, branch: impl Into<String>, outcome: BranchOutcome) {
        self.results.push(BranchResult {
            branch: branch.into(),
            outcome,
        });
    }

    /// Per-branch outcomes in the order the branches were processed.
    pub fn results(&self) -> &[BranchResult] {
        &self.results
    }

    /// Results for branches whose protection failed, in processing order.
    pub fn failures(&self) -> Vec<&BranchResult> {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, BranchOutcome::Failed { .. }))
            .collect()
    }

    pub fn newly_protected(&self) -> usize {
        self.count(|o| matches!(o, BranchOutcome::NewlyProtected))
    }

    pub fn already_protected(&self) -> usize {
        self.count(|o| matches!(o, BranchOutcome::AlreadyProtected))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, BranchOutcome::SkippedNoMatch))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, BranchOutcome::Failed { .. }))
    }

    /// Number of branches that matched the pattern, whatever happened to them.
    pub fn matched(&self) -> usize {
        self.results.len() - self.skipped()
    }

    /// Returns true if no protection request failed.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Returns true if at least one branch was protected during this run.
    pub fn has_changes(&self) -> bool {
        self.newly_protected() > 0
    }

    fn count(&self, predicate: impl Fn(&BranchOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| predicate(&r.outcome)).count()
    }
}
