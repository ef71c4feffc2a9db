//! Pull request event payload parsing.
//!
//! The workflow wrapper writes the webhook payload to disk and points at it
//! with `GITHUB_EVENT_PATH`; this module maps the parts of that payload the
//! backport run consumes. All entities here are request-scoped: parsed at the
//! start of one trigger handling and discarded at the end.

use log::*;
use serde::Deserialize;
use std::{fs, path::Path};

use crate::result::Result;
use color_eyre::eyre::WrapErr;

/// A label as it appears in the webhook payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

/// A user or organization account.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub login: String,
}

/// Pull request metadata carried by the event.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub user: Account,
    #[serde(default)]
    pub merged: bool,
    /// For a merged pull request this names either a true two-parent merge
    /// commit or the single commit a fast-forward or squash produced.
    pub merge_commit_sha: Option<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

/// Repository coordinates carried by the event.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: Account,
}

/// Payload of a `pull_request` webhook event.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    pub action: String,
    /// Present only for `labeled` events.
    pub label: Option<Label>,
    pub pull_request: PullRequest,
    pub repository: Repository,
}

/// Event shapes the target resolver branches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerAction {
    /// The pull request was closed; every backport label present fires.
    Closed,
    /// A single label was just applied; only that label fires.
    Labeled { label: String },
    /// Any other action; never yields targets.
    Other,
}

impl PullRequestEvent {
    /// Classify the raw action string into the variants the resolver
    /// branches on.
    pub fn trigger(&self) -> TriggerAction {
        match self.action.as_str() {
            "closed" => TriggerAction::Closed,
            "labeled" => match &self.label {
                Some(label) => TriggerAction::Labeled {
                    label: label.name.clone(),
                },
                None => {
                    warn!("labeled event carried no label: ignoring");
                    TriggerAction::Other
                }
            },
            _ => TriggerAction::Other,
        }
    }

    /// Names of all labels currently on the pull request.
    pub fn label_names(&self) -> Vec<String> {
        self.pull_request
            .labels
            .iter()
            .map(|l| l.name.clone())
            .collect()
    }
}

/// Load and deserialize an event payload from disk.
pub fn load(path: &Path) -> Result<PullRequestEvent> {
    let content = fs::read_to_string(path).wrap_err_with(|| {
        format!("failed to read event payload at {}", path.display())
    })?;

    let event = serde_json::from_str(&content)
        .wrap_err("failed to parse pull_request event payload")?;

    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "action": "labeled",
        "label": { "name": "backport release-1" },
        "pull_request": {
            "number": 42,
            "title": "Fix widget jitter",
            "user": { "login": "octocat" },
            "merged": true,
            "merge_commit_sha": "abc123",
            "labels": [
                { "name": "bug" },
                { "name": "backport release-1" }
            ]
        },
        "repository": {
            "name": "widget",
            "owner": { "login": "acme" }
        }
    }"#;

    #[test]
    fn parses_pull_request_payload() {
        let event: PullRequestEvent = serde_json::from_str(PAYLOAD).unwrap();

        assert_eq!(event.action, "labeled");
        assert_eq!(event.pull_request.number, 42);
        assert_eq!(event.pull_request.user.login, "octocat");
        assert_eq!(
            event.pull_request.merge_commit_sha.as_deref(),
            Some("abc123")
        );
        assert_eq!(event.repository.owner.login, "acme");
        assert_eq!(
            event.label_names(),
            vec!["bug".to_string(), "backport release-1".to_string()]
        );
    }

    #[test]
    fn classifies_labeled_action() {
        let event: PullRequestEvent = serde_json::from_str(PAYLOAD).unwrap();

        assert_eq!(
            event.trigger(),
            TriggerAction::Labeled {
                label: "backport release-1".to_string()
            }
        );
    }

    #[test]
    fn classifies_closed_action() {
        let mut event: PullRequestEvent =
            serde_json::from_str(PAYLOAD).unwrap();
        event.action = "closed".to_string();
        event.label = None;

        assert_eq!(event.trigger(), TriggerAction::Closed);
    }

    #[test]
    fn unknown_actions_are_other() {
        let mut event: PullRequestEvent =
            serde_json::from_str(PAYLOAD).unwrap();
        event.action = "synchronize".to_string();

        assert_eq!(event.trigger(), TriggerAction::Other);
    }

    #[test]
    fn labeled_without_label_is_other() {
        let mut event: PullRequestEvent =
            serde_json::from_str(PAYLOAD).unwrap();
        event.label = None;

        assert_eq!(event.trigger(), TriggerAction::Other);
    }

    #[test]
    fn missing_merged_flag_defaults_to_false() {
        let payload = r#"{
            "action": "closed",
            "pull_request": {
                "number": 7,
                "title": "t",
                "user": { "login": "dev" },
                "merge_commit_sha": null,
                "labels": []
            },
            "repository": { "name": "r", "owner": { "login": "o" } }
        }"#;

        let event: PullRequestEvent = serde_json::from_str(payload).unwrap();
        assert!(!event.pull_request.merged);
    }
}
