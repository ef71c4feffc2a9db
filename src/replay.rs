//! Replays a merged change onto one target branch and opens the backport
//! pull request.
//!
//! Exactly one replay strategy is attempted per target, chosen by probing
//! the merge commit for a second parent:
//!
//! - a true two-parent merge replays as the inclusive commit range from its
//!   first parent to its second, reproducing the merged commits in their
//!   original order as a single operation
//! - a squash or rebase merge leaves no second parent, so the listed commits
//!   of the original pull request are applied one by one, in order
//!
//! A failed cherry-pick is aborted before returning, so the working copy is
//! clean for the next target. There is no cross-strategy retry.

use log::*;

use crate::{
    error::BackportError,
    forge::{
        traits::Forge,
        types::{AddLabelsRequest, CreatePrRequest},
    },
    git::GitOps,
    target::BackportTarget,
};

/// The original merged change, as far as replaying is concerned. Immutable
/// for the duration of the run.
#[derive(Debug, Clone)]
pub struct ChangeSet {
    pub number: u64,
    pub title: String,
    pub author: String,
    /// Constituent commits in merge order, as listed by the platform.
    pub commits: Vec<String>,
    /// May name a true two-parent merge commit or the single commit a
    /// fast-forward or squash produced; only the parent probe tells which.
    pub merge_sha: String,
}

/// Per-run options applied to every created pull request.
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    pub title_template: String,
    pub labels: Vec<String>,
}

/// Substitute `{{base}}` and `{{originalTitle}}` in a title template.
///
/// Literal, case-sensitive, global replacement. Unmatched placeholders stay
/// verbatim.
pub fn render_title(
    template: &str,
    base: &str,
    original_title: &str,
) -> String {
    template
        .replace("{{base}}", base)
        .replace("{{originalTitle}}", original_title)
}

/// Replay `change` onto `target.base` in a new branch `target.head`, push
/// it, and open a pull request for it. Returns the new pull request number.
pub async fn replay(
    git: &dyn GitOps,
    forge: &dyn Forge,
    target: &BackportTarget,
    change: &ChangeSet,
    opts: &ReplayOptions,
) -> Result<u64, BackportError> {
    let base = &target.base;
    let head = &target.head;

    let setup = |source| BackportError::Setup {
        base: base.clone(),
        head: head.clone(),
        source,
    };

    git.fetch_pull_head(change.number).await.map_err(setup)?;
    git.switch(base.clone()).await.map_err(setup)?;
    git.switch_create(head.clone()).await.map_err(setup)?;

    match git.second_parent(change.merge_sha.clone()).await {
        Some(feature_tip) => {
            info!(
                "replaying merge {} onto {head} as a commit range",
                change.merge_sha
            );

            let range = format!("{}^1..{}", change.merge_sha, feature_tip);

            if let Err(source) = git.cherry_pick_range(range).await {
                abort_replay(git, head).await;
                return Err(BackportError::Replay {
                    head: head.clone(),
                    source,
                });
            }
        }
        None => {
            info!(
                "no second parent on {}: replaying {} commits onto {head}",
                change.merge_sha,
                change.commits.len()
            );

            if let Err(source) =
                git.cherry_pick_commits(change.commits.clone()).await
            {
                abort_replay(git, head).await;
                return Err(BackportError::Replay {
                    head: head.clone(),
                    source,
                });
            }
        }
    }

    git.push(head.clone())
        .await
        .map_err(|source| BackportError::Publish {
            head: head.clone(),
            source,
        })?;

    let title = render_title(&opts.title_template, base, &change.title);
    let body = format!(
        "Automated backport of #{} to `{}`.\n\nOriginal change by @{}.",
        change.number, base, change.author,
    );

    let pr_number = forge
        .create_pr(CreatePrRequest {
            head_branch: head.clone(),
            base_branch: base.clone(),
            title,
            body,
        })
        .await
        .map_err(|source| BackportError::CreatePr {
            base: base.clone(),
            source,
        })?;

    if !opts.labels.is_empty() {
        forge
            .add_labels(AddLabelsRequest {
                number: pr_number,
                labels: opts.labels.clone(),
            })
            .await
            .map_err(|source| BackportError::Label { pr_number, source })?;
    }

    Ok(pr_number)
}

/// Best-effort rollback of a failed cherry-pick; the replay failure itself
/// is what gets reported.
async fn abort_replay(git: &dyn GitOps, head: &str) {
    if let Err(err) = git.cherry_pick_abort().await {
        warn!("failed to abort cherry-pick on {head}: {err}");
    }
}
