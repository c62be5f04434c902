//! Branch protection policy.
//!
//! A [`ProtectionPolicy`] is built once per invocation and handed to the reconciler by
//! reference. It is translated into GitHub's request body by
//! [`ProtectionPolicy::to_payload`].

use std::collections::BTreeSet;

use github_client::{
    BranchProtectionPayload, PushRestrictions, RequiredPullRequestReviews, RequiredStatusChecks,
};
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;

/// Rules applied to every branch the tool protects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionPolicy {
    /// Number of approving reviews required before merging. `0` disables the review
    /// requirement entirely.
    pub required_reviews: u32,
    pub dismiss_stale_reviews: bool,
    pub require_code_owner_reviews: bool,
    pub enforce_admins: bool,
    /// Status check contexts that must pass, `None` for no requirement.
    pub required_status_checks: Option<BTreeSet<String>>,
    /// Users allowed to push, `None` for no restriction. Only effective for
    /// organization-owned repositories.
    pub restrict_push_to: Option<BTreeSet<String>>,
}

impl Default for ProtectionPolicy {
    /// One approving review from a code owner, stale approvals dismissed, administrators
    /// exempt.
    fn default() -> Self {
        Self {
            required_reviews: 1,
            dismiss_stale_reviews: true,
            require_code_owner_reviews: true,
            enforce_admins: false,
            required_status_checks: None,
            restrict_push_to: None,
        }
    }
}

impl ProtectionPolicy {
    /// Builds the branch protection request body for this policy.
    ///
    /// Force pushes and deletions are always disallowed, and linear history plus
    /// conversation resolution are always required.
    pub fn to_payload(&self) -> BranchProtectionPayload {
        let required_pull_request_reviews = if self.required_reviews > 0 {
            Some(RequiredPullRequestReviews {
                required_approving_review_count: self.required_reviews,
                dismiss_stale_reviews: self.dismiss_stale_reviews,
                require_code_owner_reviews: self.require_code_owner_reviews,
            })
        } else {
            None
        };

        BranchProtectionPayload {
            required_status_checks: self.required_status_checks.as_ref().map(|checks| {
                RequiredStatusChecks {
                    strict: true,
                    contexts: checks.iter().cloned().collect(),
                }
            }),
            enforce_admins: self.enforce_admins,
            required_pull_request_reviews,
            restrictions: self.restrict_push_to.as_ref().map(|users| PushRestrictions {
                users: users.iter().cloned().collect(),
                teams: Vec::new(),
                apps: Vec::new(),
            }),
            allow_force_pushes: false,
            allow_deletions: false,
            required_linear_history: true,
            required_conversation_resolution: true,
        }
    }
}
