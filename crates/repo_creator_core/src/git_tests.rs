//! Tests for git module

use super::*;
use std::fs;
use tempfile::TempDir;

fn token() -> SecretString {
    SecretString::from("ghp_test_token".to_string())
}

#[test]
fn test_open_or_init_creates_repository_on_branch() {
    let dir = TempDir::new().unwrap();

    let repo = open_or_init(dir.path(), "main").unwrap();

    assert!(dir.path().join(".git").exists());
    let head = repo.find_reference("HEAD").unwrap();
    assert_eq!(head.symbolic_target(), Some("refs/heads/main"));
}

#[test]
fn test_open_or_init_reuses_existing_repository() {
    let dir = TempDir::new().unwrap();
    open_or_init(dir.path(), "develop").unwrap();

    let repo = open_or_init(dir.path(), "main").unwrap();

    let head = repo.find_reference("HEAD").unwrap();
    assert_eq!(head.symbolic_target(), Some("refs/heads/develop"));
}

#[test]
fn test_commit_all_changes_creates_initial_commit() {
    let dir = TempDir::new().unwrap();
    let repo = open_or_init(dir.path(), "main").unwrap();
    fs::write(dir.path().join("README.md"), "# Test Project").unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/app.py"), "print('hi')").unwrap();

    let oid = commit_all_changes(&repo, INITIAL_COMMIT_MESSAGE)
        .unwrap()
        .expect("a commit should be created");

    let commit = repo.find_commit(oid).unwrap();
    assert_eq!(commit.message(), Some("Initial commit"));
    assert_eq!(commit.parent_count(), 0);
    assert_eq!(commit.tree().unwrap().len(), 2);
    assert_eq!(repo.head().unwrap().name(), Some("refs/heads/main"));
}

#[test]
fn test_commit_all_changes_respects_gitignore() {
    let dir = TempDir::new().unwrap();
    let repo = open_or_init(dir.path(), "main").unwrap();
    fs::write(dir.path().join(".gitignore"), ".env\n").unwrap();
    fs::write(dir.path().join(".env"), "GITHUB_TOKEN=secret").unwrap();
    fs::write(dir.path().join("README.md"), "# Test").unwrap();

    let oid = commit_all_changes(&repo, INITIAL_COMMIT_MESSAGE).unwrap().unwrap();

    let tree = repo.find_commit(oid).unwrap().tree().unwrap();
    assert!(tree.get_name(".env").is_none());
    assert!(tree.get_name("README.md").is_some());
}

#[test]
fn test_commit_all_changes_empty_directory_fails() {
    let dir = TempDir::new().unwrap();
    let repo = open_or_init(dir.path(), "main").unwrap();

    let result = commit_all_changes(&repo, INITIAL_COMMIT_MESSAGE);

    assert!(matches!(result, Err(GitError::NothingToCommit { .. })));
}

#[test]
fn test_commit_all_changes_skips_when_unchanged() {
    let dir = TempDir::new().unwrap();
    let repo = open_or_init(dir.path(), "main").unwrap();
    fs::write(dir.path().join("README.md"), "# Test").unwrap();
    commit_all_changes(&repo, INITIAL_COMMIT_MESSAGE).unwrap();

    let second = commit_all_changes(&repo, INITIAL_COMMIT_MESSAGE).unwrap();

    assert!(second.is_none());
}

#[test]
fn test_commit_all_changes_adds_child_commit() {
    let dir = TempDir::new().unwrap();
    let repo = open_or_init(dir.path(), "main").unwrap();
    fs::write(dir.path().join("README.md"), "# Test").unwrap();
    let first = commit_all_changes(&repo, INITIAL_COMMIT_MESSAGE).unwrap().unwrap();
    fs::write(dir.path().join("NOTES.md"), "notes").unwrap();

    let second = commit_all_changes(&repo, INITIAL_COMMIT_MESSAGE).unwrap().unwrap();

    let commit = repo.find_commit(second).unwrap();
    assert_eq!(commit.parent_id(0).unwrap(), first);
}

#[test]
fn test_set_origin_adds_then_updates() {
    let dir = TempDir::new().unwrap();
    let repo = open_or_init(dir.path(), "main").unwrap();

    set_origin(&repo, "https://github.com/octocat/one.git").unwrap();
    set_origin(&repo, "https://github.com/octocat/two.git").unwrap();

    let remote = repo.find_remote("origin").unwrap();
    assert_eq!(remote.url(), Some("https://github.com/octocat/two.git"));
}

#[tokio::test]
async fn test_publish_pushes_to_bare_remote() {
    let work = TempDir::new().unwrap();
    let remote_dir = TempDir::new().unwrap();
    Repository::init_bare(remote_dir.path()).unwrap();
    fs::write(work.path().join("README.md"), "# Published").unwrap();

    let publisher = GitPublisher::new(token());
    let outcome = publisher
        .publish(
            work.path(),
            remote_dir.path().to_str().unwrap(),
            DEFAULT_BRANCH,
        )
        .await
        .unwrap();

    assert!(outcome.committed);
    let bare = Repository::open_bare(remote_dir.path()).unwrap();
    let pushed = bare.find_reference("refs/heads/main").unwrap();
    assert_eq!(pushed.target().unwrap().to_string(), outcome.commit_sha);
}

#[tokio::test]
async fn test_publish_existing_history_pushes_without_new_commit() {
    let work = TempDir::new().unwrap();
    let remote_dir = TempDir::new().unwrap();
    Repository::init_bare(remote_dir.path()).unwrap();
    fs::write(work.path().join("README.md"), "# Published").unwrap();
    let repo = open_or_init(work.path(), "main").unwrap();
    let existing = commit_all_changes(&repo, "Earlier work").unwrap().unwrap();

    let outcome = GitPublisher::new(token())
        .publish(
            work.path(),
            remote_dir.path().to_str().unwrap(),
            DEFAULT_BRANCH,
        )
        .await
        .unwrap();

    assert!(!outcome.committed);
    assert_eq!(outcome.commit_sha, existing.to_string());
}

#[tokio::test]
async fn test_publish_to_missing_remote_fails() {
    let work = TempDir::new().unwrap();
    let missing = TempDir::new().unwrap();
    fs::write(work.path().join("README.md"), "# Published").unwrap();
    let url = missing.path().join("does-not-exist.git");

    let result = GitPublisher::new(token())
        .publish(work.path(), url.to_str().unwrap(), DEFAULT_BRANCH)
        .await;

    assert!(matches!(
        result,
        Err(crate::RepoCreatorError::Git(GitError::PushFailed { .. }))
    ));
}
