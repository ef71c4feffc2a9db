//! Backport orchestration: resolve targets, replay each one, report
//! failures on the original change.

use color_eyre::eyre::eyre;
use log::*;
use std::{env, fs, path::PathBuf};

use crate::{
    cli::Args,
    error::BackportError,
    event::PullRequestEvent,
    forge::{
        config::FAILED_LABEL,
        github::Github,
        traits::Forge,
        types::{AddLabelsRequest, CreateCommentRequest},
    },
    git::{Git, GitOps},
    replay::{self, ChangeSet, ReplayOptions},
    report::FailureReport,
    result::Result,
    target::{self, BackportTarget},
};

/// Process one pull request event end to end.
pub async fn execute(args: &Args, event: &PullRequestEvent) -> Result<()> {
    let pr = &event.pull_request;

    if !pr.merged {
        info!("pull request #{} is not merged: nothing to backport", pr.number);
        return Ok(());
    }

    let targets =
        target::resolve(&event.trigger(), &event.label_names(), pr.number)?;

    if targets.is_empty() {
        info!("no backport targets requested for #{}", pr.number);
        return Ok(());
    }

    let merge_sha = pr.merge_commit_sha.clone().ok_or_else(|| {
        eyre!("merged pull request #{} has no merge commit sha", pr.number)
    })?;

    let remote = args.get_remote(event)?;
    let forge = Github::new(remote.clone())?;

    let commits = forge.list_pr_commits(pr.number).await?;

    let change = ChangeSet {
        number: pr.number,
        title: pr.title.clone(),
        author: pr.user.login.clone(),
        commits,
        merge_sha,
    };

    let workdir = prepare_workdir(args, &remote.owner, &remote.repo, pr.number)?;
    let git = Git::clone(&workdir, &remote).await?;
    git.configure_identity(&args.git_user_name, &args.git_user_email)
        .await?;

    let opts = ReplayOptions {
        title_template: args.title_template.clone(),
        labels: args.labels.clone(),
    };

    run_targets(&git, &forge, &targets, &change, &opts).await
}

/// Replay every target, isolating expected failures to the failing target.
///
/// Targets run strictly one after another: they all share the one on-disk
/// working copy, whose checked-out branch is mutated in place. Parallelizing
/// across targets would require an isolated clone or worktree per target.
async fn run_targets(
    git: &dyn GitOps,
    forge: &dyn Forge,
    targets: &[BackportTarget],
    change: &ChangeSet,
    opts: &ReplayOptions,
) -> Result<()> {
    for target in targets {
        info!(
            "backporting #{} to {} as {}",
            change.number, target.base, target.head
        );

        match replay::replay(git, forge, target, change, opts).await {
            Ok(pr_number) => {
                info!(
                    "created backport pull request #{pr_number} for {}",
                    target.base
                );
            }
            Err(err) => report_failure(forge, target, change, &err).await?,
        }
    }

    Ok(())
}

/// Post the failure comment and label on the original change. Errors raised
/// here are not expected replay failures and abort the run.
async fn report_failure(
    forge: &dyn Forge,
    target: &BackportTarget,
    change: &ChangeSet,
    error: &BackportError,
) -> Result<()> {
    error!(
        "backport of #{} to {} failed: {error}",
        change.number, target.base
    );

    let report = FailureReport {
        target,
        commits: &change.commits,
        error,
    };

    forge
        .create_comment(CreateCommentRequest {
            number: change.number,
            body: report.comment_body(),
        })
        .await?;

    forge
        .add_labels(AddLabelsRequest {
            number: change.number,
            labels: vec![FAILED_LABEL.to_string()],
        })
        .await?;

    Ok(())
}

/// Working directory for the clone. A caller-provided directory is used as
/// is; the derived per-change default under the system temp dir is removed
/// first when a stale copy from an earlier run is still around.
fn prepare_workdir(
    args: &Args,
    owner: &str,
    repo: &str,
    pr_number: u64,
) -> Result<PathBuf> {
    if !args.workdir.is_empty() {
        return Ok(PathBuf::from(&args.workdir));
    }

    let dir = env::temp_dir().join(format!("backport-{owner}-{repo}-{pr_number}"));

    if dir.exists() {
        debug!("removing stale working copy at {}", dir.display());
        fs::remove_dir_all(&dir)?;
    }

    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::{
        error::GitError,
        forge::traits::MockForge,
        git::{GitOutput, MockGitOps},
        test_helpers,
    };

    #[tokio::test]
    async fn unmerged_change_is_a_no_op() {
        let args = test_helpers::create_test_args();
        let mut event = test_helpers::create_test_event("closed");
        event.pull_request.merged = false;

        // Returns before any client is even constructed, so no API calls
        // can happen.
        execute(&args, &event).await.unwrap();
    }

    #[tokio::test]
    async fn event_without_backport_labels_is_a_no_op() {
        let args = test_helpers::create_test_args();
        let mut event = test_helpers::create_test_event("closed");
        event.pull_request.labels = vec![];

        execute(&args, &event).await.unwrap();
    }

    #[tokio::test]
    async fn failed_target_does_not_block_the_next_one() {
        let change = test_helpers::create_test_change_set();
        let targets = vec![
            test_helpers::create_test_target("v1"),
            test_helpers::create_test_target("v2"),
        ];

        let mut git = MockGitOps::new();
        git.expect_fetch_pull_head()
            .times(2)
            .returning(|_| Ok(GitOutput::default()));
        git.expect_switch()
            .times(2)
            .returning(|_| Ok(GitOutput::default()));
        git.expect_switch_create()
            .times(2)
            .returning(|_| Ok(GitOutput::default()));
        git.expect_second_parent().times(2).returning(|_| None);

        // First target conflicts, second applies cleanly.
        let picks = AtomicUsize::new(0);
        git.expect_cherry_pick_commits().times(2).returning(
            move |_| {
                if picks.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(GitError::Exit {
                        command: "cherry-pick abc123 def456".to_string(),
                        status: 1,
                        stdout: "".to_string(),
                        stderr: "could not apply abc123".to_string(),
                    })
                } else {
                    Ok(GitOutput::default())
                }
            },
        );
        git.expect_cherry_pick_abort()
            .times(1)
            .returning(|| Ok(GitOutput::default()));
        git.expect_push()
            .withf(|branch| branch == "backport-42-to-v2")
            .times(1)
            .returning(|_| Ok(GitOutput::default()));

        let mut forge = MockForge::new();
        forge
            .expect_create_pr()
            .withf(|req| req.base_branch == "v2")
            .times(1)
            .returning(|_| Ok(101));
        forge
            .expect_create_comment()
            .withf(|req| {
                req.number == 42
                    && req.body.contains("`v1`")
                    && req.body.contains("backport-42-to-v1")
                    && !req.body.contains("backport-42-to-v2")
            })
            .times(1)
            .returning(|_| Ok(()));
        forge
            .expect_add_labels()
            .withf(|req| {
                req.number == 42
                    && req.labels == vec![FAILED_LABEL.to_string()]
            })
            .times(1)
            .returning(|_| Ok(()));

        let opts = test_helpers::create_test_replay_options();
        run_targets(&git, &forge, &targets, &change, &opts)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn successful_run_posts_no_comment() {
        let change = test_helpers::create_test_change_set();
        let targets = vec![test_helpers::create_test_target("v1")];

        let mut git = MockGitOps::new();
        git.expect_fetch_pull_head()
            .returning(|_| Ok(GitOutput::default()));
        git.expect_switch().returning(|_| Ok(GitOutput::default()));
        git.expect_switch_create()
            .returning(|_| Ok(GitOutput::default()));
        git.expect_second_parent().returning(|_| None);
        git.expect_cherry_pick_commits()
            .returning(|_| Ok(GitOutput::default()));
        git.expect_push().returning(|_| Ok(GitOutput::default()));

        let mut forge = MockForge::new();
        forge.expect_create_pr().times(1).returning(|_| Ok(101));
        forge.expect_create_comment().times(0);
        forge.expect_add_labels().times(0);

        let opts = test_helpers::create_test_replay_options();
        run_targets(&git, &forge, &targets, &change, &opts)
            .await
            .unwrap();
    }

    #[test]
    fn explicit_workdir_is_used_as_is() {
        let mut args = test_helpers::create_test_args();
        args.workdir = "/tmp/backport-workdir".to_string();

        let dir = prepare_workdir(&args, "acme", "widget", 42).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/backport-workdir"));
    }

    #[test]
    fn derived_workdir_is_deterministic_per_change() {
        let args = test_helpers::create_test_args();

        let dir = prepare_workdir(&args, "acme", "widget", 42).unwrap();
        assert!(
            dir.ends_with("backport-acme-widget-42"),
            "unexpected workdir: {}",
            dir.display()
        );
    }
}
