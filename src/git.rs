//! Git working-copy operations and management.
//!
//! This module provides the version-control executor the replay engine runs
//! against. All operations go through the [`GitOps`] trait so the engine can
//! be exercised with mocks; the concrete [`Git`] shells out to the system
//! `git` binary with `tokio::process`, capturing both output streams, and
//! turns any non-zero exit into a structured [`GitError`].
//!
//! # Authentication
//!
//! Cloning authenticates by embedding the access token in the remote URL.
//! The token is scrubbed from every recorded command line so it can never
//! reach logs, error messages, or failure comments.
//!
//! # Working Directory
//!
//! All operations after the clone execute inside the working copy. The
//! checked-out branch is mutated in place, which is why targets must be
//! processed strictly one after another (see the orchestrator).

use async_trait::async_trait;
use log::*;
use secrecy::ExposeSecret;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::{
    error::GitError,
    forge::config::RemoteConfig,
};

#[cfg(test)]
use mockall::automock;

/// Captured output of a completed git subprocess.
#[derive(Debug, Clone, Default)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Named git operations used by the replay engine.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GitOps: Send + Sync {
    /// Fetch `refs/pull/<number>/head` so the original commits stay reachable
    /// even if the source branch was deleted after the merge.
    async fn fetch_pull_head(
        &self,
        pr_number: u64,
    ) -> Result<GitOutput, GitError>;

    /// Switch the working copy to an existing branch. Fails if the branch
    /// does not exist locally or on the remote.
    async fn switch(&self, branch: String) -> Result<GitOutput, GitError>;

    /// Create a new branch at the current HEAD and switch to it. Fails if a
    /// branch with that name already exists.
    async fn switch_create(
        &self,
        branch: String,
    ) -> Result<GitOutput, GitError>;

    /// Resolve the second parent of a commit.
    ///
    /// `None` means the commit is not a merge commit, or that the probe
    /// failed for any other reason; the two cases are deliberately not
    /// distinguished, matching the squash and rebase-merge flows that leave
    /// no second parent to find.
    async fn second_parent(&self, sha: String) -> Option<String>;

    /// Apply an inclusive commit range as a single cherry-pick operation.
    async fn cherry_pick_range(
        &self,
        range: String,
    ) -> Result<GitOutput, GitError>;

    /// Apply individual commits in order.
    async fn cherry_pick_commits(
        &self,
        commits: Vec<String>,
    ) -> Result<GitOutput, GitError>;

    /// Roll back a failed cherry-pick, restoring a clean working copy.
    async fn cherry_pick_abort(&self) -> Result<GitOutput, GitError>;

    /// Publish a branch to the remote.
    async fn push(&self, branch: String) -> Result<GitOutput, GitError>;
}

/// Working-copy handle backed by the system git binary.
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    /// Attach to an existing working copy.
    pub fn open(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Clone the configured repository into `workdir` using the scoped token
    /// and return a handle to the fresh working copy.
    pub async fn clone(
        workdir: &Path,
        config: &RemoteConfig,
    ) -> Result<Self, GitError> {
        let url = format!(
            "{}://x-access-token:{}@{}/{}/{}.git",
            config.scheme,
            config.token.expose_secret(),
            config.host,
            config.owner,
            config.repo,
        );

        // Recorded command line never contains the token.
        let display = format!(
            "clone {}://x-access-token:***@{}/{}/{}.git {}",
            config.scheme,
            config.host,
            config.owner,
            config.repo,
            workdir.display(),
        );

        info!(
            "cloning {}/{} into {}",
            config.owner,
            config.repo,
            workdir.display()
        );

        let path = workdir.display().to_string();
        exec(&["clone", url.as_str(), path.as_str()], None, display).await?;

        Ok(Self {
            workdir: workdir.to_path_buf(),
        })
    }

    /// Configure the commit identity used for replayed commits, scoped to
    /// this working copy.
    pub async fn configure_identity(
        &self,
        name: &str,
        email: &str,
    ) -> Result<(), GitError> {
        self.run(&["config", "user.name", name]).await?;
        self.run(&["config", "user.email", email]).await?;
        Ok(())
    }

    async fn run(&self, args: &[&str]) -> Result<GitOutput, GitError> {
        exec(args, Some(&self.workdir), args.join(" ")).await
    }
}

/// Run a git subprocess, capturing both streams. The `command` string is what
/// gets recorded in errors and logs; callers pass a scrubbed variant when the
/// real arguments carry credentials.
async fn exec(
    args: &[&str],
    cwd: Option<&Path>,
    command: String,
) -> Result<GitOutput, GitError> {
    debug!("running: git {command}");

    let mut cmd = Command::new("git");
    cmd.args(args);

    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let output = cmd.output().await.map_err(|source| GitError::Spawn {
        command: command.clone(),
        source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(GitError::Exit {
            command,
            status: output.status.code().unwrap_or(-1),
            stdout,
            stderr,
        });
    }

    Ok(GitOutput { stdout, stderr })
}

#[async_trait]
impl GitOps for Git {
    async fn fetch_pull_head(
        &self,
        pr_number: u64,
    ) -> Result<GitOutput, GitError> {
        let refspec = format!("refs/pull/{pr_number}/head");
        self.run(&["fetch", "origin", &refspec]).await
    }

    async fn switch(&self, branch: String) -> Result<GitOutput, GitError> {
        info!("switching to branch: {branch}");
        self.run(&["switch", &branch]).await
    }

    async fn switch_create(
        &self,
        branch: String,
    ) -> Result<GitOutput, GitError> {
        info!("creating branch: {branch}");
        self.run(&["switch", "--create", &branch]).await
    }

    async fn second_parent(&self, sha: String) -> Option<String> {
        let rev = format!("{sha}^2");

        match self.run(&["rev-parse", "--verify", &rev]).await {
            Ok(output) => Some(output.stdout.trim().to_string()),
            Err(err) => {
                debug!("second-parent probe for {sha} came up empty: {err}");
                None
            }
        }
    }

    async fn cherry_pick_range(
        &self,
        range: String,
    ) -> Result<GitOutput, GitError> {
        self.run(&["cherry-pick", &range]).await
    }

    async fn cherry_pick_commits(
        &self,
        commits: Vec<String>,
    ) -> Result<GitOutput, GitError> {
        let mut args = vec!["cherry-pick"];
        args.extend(commits.iter().map(String::as_str));
        self.run(&args).await
    }

    async fn cherry_pick_abort(&self) -> Result<GitOutput, GitError> {
        self.run(&["cherry-pick", "--abort"]).await
    }

    async fn push(&self, branch: String) -> Result<GitOutput, GitError> {
        info!("pushing branch: {branch}");
        self.run(&["push", "--set-upstream", "origin", &branch])
            .await
    }
}
