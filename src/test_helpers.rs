//! Common test helper functions shared across test modules.
//!
//! This module provides reusable utilities for creating test fixtures,
//! reducing duplication across the different test suites.
use secrecy::SecretString;

use crate::{
    cli::{Args, DEFAULT_TITLE_TEMPLATE},
    event::{Account, Label, PullRequest, PullRequestEvent, Repository},
    forge::config::RemoteConfig,
    replay::{ChangeSet, ReplayOptions},
    target::BackportTarget,
};

/// Creates a test RemoteConfig with sensible defaults.
pub fn create_test_remote_config() -> RemoteConfig {
    RemoteConfig {
        host: "github.com".to_string(),
        scheme: "https".to_string(),
        api_url: "https://api.github.com".to_string(),
        owner: "acme".to_string(),
        repo: "widget".to_string(),
        token: SecretString::from("test-token".to_string()),
    }
}

/// Creates test Args equivalent to running with no flags.
pub fn create_test_args() -> Args {
    Args {
        event_path: "".to_string(),
        github_token: "".to_string(),
        github_server_url: "".to_string(),
        github_api_url: "".to_string(),
        labels: vec![],
        title_template: DEFAULT_TITLE_TEMPLATE.to_string(),
        workdir: "".to_string(),
        git_user_name: "github-actions[bot]".to_string(),
        git_user_email: "github-actions[bot]@users.noreply.github.com"
            .to_string(),
        debug: false,
    }
}

/// Creates a merged pull request event for `acme/widget` #42 carrying one
/// backport label.
pub fn create_test_event(action: &str) -> PullRequestEvent {
    PullRequestEvent {
        action: action.to_string(),
        label: None,
        pull_request: PullRequest {
            number: 42,
            title: "Fix widget jitter".to_string(),
            user: Account {
                login: "octocat".to_string(),
            },
            merged: true,
            merge_commit_sha: Some("merge789".to_string()),
            labels: vec![Label {
                name: "backport v1".to_string(),
            }],
        },
        repository: Repository {
            name: "widget".to_string(),
            owner: Account {
                login: "acme".to_string(),
            },
        },
    }
}

/// Creates the ChangeSet matching [`create_test_event`].
pub fn create_test_change_set() -> ChangeSet {
    ChangeSet {
        number: 42,
        title: "Fix widget jitter".to_string(),
        author: "octocat".to_string(),
        commits: vec!["abc123".to_string(), "def456".to_string()],
        merge_sha: "merge789".to_string(),
    }
}

/// Creates a target with the default generated head branch for #42.
pub fn create_test_target(base: &str) -> BackportTarget {
    BackportTarget {
        base: base.to_string(),
        head: format!("backport-42-to-{base}"),
    }
}

/// Creates replay options using the default title template and no extra
/// labels.
pub fn create_test_replay_options() -> ReplayOptions {
    ReplayOptions {
        title_template: DEFAULT_TITLE_TEMPLATE.to_string(),
        labels: vec![],
    }
}
