//! Branch protection domain types.
//!
//! This module contains the request body for
//! `PUT /repos/{owner}/{repo}/branches/{branch}/protection`.
//!
//! GitHub requires the four top-level keys `required_status_checks`, `enforce_admins`,
//! `required_pull_request_reviews` and `restrictions` to be present on every request, so
//! they are serialized as `null` rather than skipped when unset.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "branch_protection_tests.rs"]
mod tests;

/// Request body used to protect a branch.
///
/// # Examples
///
/// ```rust
/// use github_client::{BranchProtectionPayload, RequiredPullRequestReviews};
///
/// let payload = BranchProtectionPayload {
///     required_pull_request_reviews: Some(RequiredPullRequestReviews {
///         required_approving_review_count: 1,
///         dismiss_stale_reviews: true,
///         require_code_owner_reviews: true,
///     }),
///     ..Default::default()
/// };
///
/// assert!(!payload.allow_force_pushes);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BranchProtectionPayload {
    /// Status checks that must pass before merging, `None` disables the requirement
    pub required_status_checks: Option<RequiredStatusChecks>,
    /// Whether the rules also apply to repository administrators
    pub enforce_admins: bool,
    /// Pull request review requirements, `None` disables the requirement
    pub required_pull_request_reviews: Option<RequiredPullRequestReviews>,
    /// Who may push to the branch, `None` means no restriction
    pub restrictions: Option<PushRestrictions>,
    /// Whether force pushes are allowed
    pub allow_force_pushes: bool,
    /// Whether the branch may be deleted
    pub allow_deletions: bool,
    /// Whether merge commits are rejected
    pub required_linear_history: bool,
    /// Whether all review conversations must be resolved before merging
    pub required_conversation_resolution: bool,
}

/// Pull request review requirements of a protected branch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RequiredPullRequestReviews {
    /// Required number of approving reviews before merging
    pub required_approving_review_count: u32,
    /// Whether stale reviews are dismissed when new commits are pushed
    pub dismiss_stale_reviews: bool,
    /// Whether code owner reviews are required
    pub require_code_owner_reviews: bool,
}

/// Status check requirements of a protected branch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RequiredStatusChecks {
    /// Require branches to be up to date before merging
    pub strict: bool,
    /// Names of the checks that must pass
    pub contexts: Vec<String>,
}

/// Users, teams and apps allowed to push to a protected branch.
///
/// Only honoured by GitHub for organization-owned repositories.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PushRestrictions {
    pub users: Vec<String>,
    pub teams: Vec<String>,
    #[serde(default)]
    pub apps: Vec<String>,
}
