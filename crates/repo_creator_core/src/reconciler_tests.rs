//! Tests for reconciler module.

use super::*;
use crate::test_support::MockGitHub;
use crate::{GitHubError, RepoCreatorError};

const OWNER: &str = "octocat";
const REPO: &str = "hello-world";

fn sample_branches(protected_safe_hotfix: bool) -> [(&'static str, bool); 4] {
    [
        ("main", false),
        ("safe-hotfix", protected_safe_hotfix),
        ("feature-x", false),
        ("prod-safe", false),
    ]
}

// ============================================================================
// ReconciliationReport Tests
// ============================================================================

#[test]
fn test_report_new_is_empty_and_successful() {
    let report = ReconciliationReport::new();

    assert!(report.results().is_empty());
    assert!(report.is_success());
    assert!(!report.has_changes());
    assert_eq!(report.matched(), 0);
}

#[test]
fn test_report_counters() {
    let mut report = ReconciliationReport::default();
    report.push("a", BranchOutcome::NewlyProtected);
    report.push("b", BranchOutcome::AlreadyProtected);
    report.push("c", BranchOutcome::SkippedNoMatch);
    report.push(
        "d",
        BranchOutcome::Failed {
            reason: "nope".to_string(),
        },
    );

    assert_eq!(report.newly_protected(), 1);
    assert_eq!(report.already_protected(), 1);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.matched(), 3);
    assert!(!report.is_success());
    assert!(report.has_changes());
    assert_eq!(report.failures()[0].branch, "d");
}

#[test]
fn test_report_serializes_outcome_tag() {
    let mut report = ReconciliationReport::new();
    report.push(
        "safe",
        BranchOutcome::Failed {
            reason: "forbidden".to_string(),
        },
    );

    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["results"][0]["branch"], "safe");
    assert_eq!(json["results"][0]["outcome"], "failed");
    assert_eq!(json["results"][0]["reason"], "forbidden");
}

// ============================================================================
// BranchProtectionReconciler Tests
// ============================================================================

#[tokio::test]
async fn test_protects_only_unprotected_matching_branches() {
    let client = MockGitHub::with_branches(OWNER, &sample_branches(true));
    let policy = ProtectionPolicy::default();
    let reconciler = BranchProtectionReconciler::new(&client, PatternMatcher::new("safe"), &policy);

    let report = reconciler.reconcile(OWNER, REPO).await.unwrap();

    assert_eq!(client.protection_calls().await, vec!["prod-safe".to_string()]);
    assert_eq!(report.newly_protected(), 1);
    assert_eq!(report.already_protected(), 1);
    assert_eq!(report.skipped(), 2);
    assert!(report.is_success());
}

#[tokio::test]
async fn test_prod_pattern_protects_only_prod_branch() {
    let client = MockGitHub::with_branches(OWNER, &sample_branches(false));
    let policy = ProtectionPolicy::default();
    let reconciler = BranchProtectionReconciler::new(&client, PatternMatcher::new("prod"), &policy);

    let report = reconciler.reconcile(OWNER, REPO).await.unwrap();

    assert_eq!(client.protection_calls().await, vec!["prod-safe".to_string()]);
    assert_eq!(report.newly_protected(), 1);
    assert_eq!(report.already_protected(), 0);
}

#[tokio::test]
async fn test_second_run_makes_no_changes() {
    let client = MockGitHub::with_branches(OWNER, &sample_branches(false));
    let policy = ProtectionPolicy::default();
    let reconciler = BranchProtectionReconciler::new(&client, PatternMatcher::new("safe"), &policy);

    let first = reconciler.reconcile(OWNER, REPO).await.unwrap();
    let second = reconciler.reconcile(OWNER, REPO).await.unwrap();

    assert_eq!(first.newly_protected(), 2);
    assert_eq!(second.newly_protected(), 0);
    assert_eq!(second.already_protected(), 2);
    assert!(!second.has_changes());
    assert_eq!(client.protection_calls().await.len(), 2);
}

#[tokio::test]
async fn test_forbidden_on_every_branch_reports_all_failures() {
    let client = MockGitHub::with_branches(OWNER, &sample_branches(false));
    client.fail_all_protection(403).await;
    let policy = ProtectionPolicy::default();
    let reconciler = BranchProtectionReconciler::new(&client, PatternMatcher::new("safe"), &policy);

    let report = reconciler.reconcile(OWNER, REPO).await.unwrap();

    assert_eq!(report.newly_protected(), 0);
    assert_eq!(report.failed(), 2);
    assert!(!report.is_success());
    let failed: Vec<&str> = report.failures().iter().map(|r| r.branch.as_str()).collect();
    assert_eq!(failed, vec!["safe-hotfix", "prod-safe"]);
    for failure in report.failures() {
        match &failure.outcome {
            BranchOutcome::Failed { reason } => assert!(reason.contains("403")),
            other => panic!("unexpected outcome {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_failure_on_one_branch_does_not_stop_others() {
    let client = MockGitHub::with_branches(
        OWNER,
        &[("safe-a", false), ("safe-b", false), ("safe-c", false)],
    );
    client.fail_protection_for("safe-b", 422).await;
    let policy = ProtectionPolicy::default();
    let reconciler = BranchProtectionReconciler::new(&client, PatternMatcher::default(), &policy);

    let report = reconciler.reconcile(OWNER, REPO).await.unwrap();

    assert_eq!(
        client.protection_calls().await,
        vec!["safe-a".to_string(), "safe-b".to_string(), "safe-c".to_string()]
    );
    assert_eq!(report.newly_protected(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.failures()[0].branch, "safe-b");
}

#[tokio::test]
async fn test_results_preserve_listing_order() {
    let names = ["zeta-safe", "alpha", "SAFE-mid", "beta"];
    let branches: Vec<(&str, bool)> = names.iter().map(|n| (*n, false)).collect();
    let client = MockGitHub::with_branches(OWNER, &branches);
    let policy = ProtectionPolicy::default();
    let reconciler = BranchProtectionReconciler::new(&client, PatternMatcher::default(), &policy);

    let report = reconciler.reconcile(OWNER, REPO).await.unwrap();

    let order: Vec<&str> = report.results().iter().map(|r| r.branch.as_str()).collect();
    assert_eq!(order, names.to_vec());
    assert_eq!(
        client.protection_calls().await,
        vec!["zeta-safe".to_string(), "SAFE-mid".to_string()]
    );
}

#[tokio::test]
async fn test_blank_pattern_protects_nothing() {
    let client = MockGitHub::with_branches(OWNER, &sample_branches(false));
    let policy = ProtectionPolicy::default();
    let reconciler = BranchProtectionReconciler::new(&client, PatternMatcher::new("  "), &policy);

    let report = reconciler.reconcile(OWNER, REPO).await.unwrap();

    assert!(client.protection_calls().await.is_empty());
    assert_eq!(report.skipped(), 4);
    assert_eq!(report.matched(), 0);
}

#[tokio::test]
async fn test_empty_repository_yields_empty_report() {
    let client = MockGitHub::new(OWNER);
    let policy = ProtectionPolicy::default();
    let reconciler = BranchProtectionReconciler::new(&client, PatternMatcher::default(), &policy);

    let report = reconciler.reconcile(OWNER, REPO).await.unwrap();

    assert!(report.results().is_empty());
    assert!(report.is_success());
}

#[tokio::test]
async fn test_listing_failure_is_fatal() {
    let client = MockGitHub::with_branches(OWNER, &sample_branches(false));
    client.fail_listing(404).await;
    let policy = ProtectionPolicy::default();
    let reconciler = BranchProtectionReconciler::new(&client, PatternMatcher::default(), &policy);

    let result = reconciler.reconcile(OWNER, REPO).await;

    assert!(matches!(
        result,
        Err(RepoCreatorError::GitHub(GitHubError::NotFound { .. }))
    ));
    assert!(client.protection_calls().await.is_empty());
}

#[tokio::test]
async fn test_reconcile_branches_uses_given_subset() {
    let client = MockGitHub::new(OWNER);
    let policy = ProtectionPolicy::default();
    let reconciler = BranchProtectionReconciler::new(&client, PatternMatcher::default(), &policy);
    let branches = vec![Branch::new("safe-only", "abc", false)];

    let report = reconciler.reconcile_branches(OWNER, REPO, &branches).await;

    assert_eq!(client.list_calls().await, 0);
    assert_eq!(report.newly_protected(), 1);
}

#[tokio::test]
async fn test_sends_policy_payload() {
    let client = MockGitHub::with_branches(OWNER, &[("safe", false)]);
    let policy = ProtectionPolicy {
        required_reviews: 2,
        ..Default::default()
    };
    let reconciler = BranchProtectionReconciler::new(&client, PatternMatcher::default(), &policy);

    reconciler.reconcile(OWNER, REPO).await.unwrap();

    let payloads = client.protection_payloads().await;
    assert_eq!(payloads, vec![policy.to_payload()]);
}
