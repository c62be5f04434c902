use super::*;
use serde_json::{from_str, json, to_value};

#[test]
fn test_branch_protection_serializes_required_keys_as_null() {
    let payload = BranchProtectionPayload::default();

    let value = to_value(&payload).expect("Failed to serialize BranchProtectionPayload");

    assert!(value["required_status_checks"].is_null());
    assert!(value["required_pull_request_reviews"].is_null());
    assert!(value["restrictions"].is_null());
    assert_eq!(value["enforce_admins"], false);
}

#[test]
fn test_branch_protection_serialization() {
    let payload = BranchProtectionPayload {
        required_status_checks: Some(RequiredStatusChecks {
            strict: true,
            contexts: vec!["ci/build".to_string()],
        }),
        enforce_admins: true,
        required_pull_request_reviews: Some(RequiredPullRequestReviews {
            required_approving_review_count: 2,
            dismiss_stale_reviews: true,
            require_code_owner_reviews: false,
        }),
        restrictions: Some(PushRestrictions {
            users: vec!["octocat".to_string()],
            teams: vec![],
            apps: vec![],
        }),
        allow_force_pushes: false,
        allow_deletions: false,
        required_linear_history: true,
        required_conversation_resolution: true,
    };

    let value = to_value(&payload).expect("Failed to serialize BranchProtectionPayload");

    assert_eq!(
        value,
        json!({
            "required_status_checks": { "strict": true, "contexts": ["ci/build"] },
            "enforce_admins": true,
            "required_pull_request_reviews": {
                "required_approving_review_count": 2,
                "dismiss_stale_reviews": true,
                "require_code_owner_reviews": false
            },
            "restrictions": { "users": ["octocat"], "teams": [], "apps": [] },
            "allow_force_pushes": false,
            "allow_deletions": false,
            "required_linear_history": true,
            "required_conversation_resolution": true
        })
    );
}

#[test]
fn test_push_restrictions_deserialization_without_apps() {
    let json_str = r#"{ "users": ["a"], "teams": ["core"] }"#;

    let restrictions: PushRestrictions =
        from_str(json_str).expect("Failed to deserialize PushRestrictions");

    assert_eq!(restrictions.users, vec!["a".to_string()]);
    assert_eq!(restrictions.teams, vec!["core".to_string()]);
    assert!(restrictions.apps.is_empty());
}
