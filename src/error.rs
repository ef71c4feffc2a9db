//! Typed failure taxonomy for backport operations.
//!
//! Every failure a human is expected to recover from by hand lands in
//! [`BackportError`]. The orchestrator reports these on the original pull
//! request instead of crashing the run. Anything not expressible here is a
//! defect and must propagate through [`crate::result::Result`] untouched,
//! because masking a tooling bug as a "backport failed" comment would point
//! the user at the wrong problem.

use thiserror::Error;

/// Failure of a single git subprocess invocation.
///
/// Carries the scrubbed command line and both captured streams so a failure
/// report can be rendered without re-running anything.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to spawn `git {command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`git {command}` exited with status {status}")]
    Exit {
        command: String,
        status: i32,
        stdout: String,
        stderr: String,
    },
}

impl GitError {
    /// Captured standard output of the failed process, empty if it never ran.
    pub fn stdout(&self) -> &str {
        match self {
            GitError::Spawn { .. } => "",
            GitError::Exit { stdout, .. } => stdout,
        }
    }

    /// Captured standard error of the failed process, empty if it never ran.
    pub fn stderr(&self) -> &str {
        match self {
            GitError::Spawn { .. } => "",
            GitError::Exit { stderr, .. } => stderr,
        }
    }
}

/// Failure of a hosting-platform API call.
#[derive(Debug, Error)]
#[error("{context}: {message}")]
pub struct ForgeError {
    pub context: String,
    pub message: String,
}

impl ForgeError {
    pub fn new(
        context: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        Self {
            context: context.into(),
            message: message.to_string(),
        }
    }
}

/// Expected, human-recoverable failures of a single backport target.
#[derive(Debug, Error)]
pub enum BackportError {
    /// Branch state could not be prepared: the base branch does not exist on
    /// the remote, the head branch already exists, or the original change's
    /// ref could not be fetched.
    #[error("failed to prepare branch {head} from {base}: {source}")]
    Setup {
        base: String,
        head: String,
        #[source]
        source: GitError,
    },

    /// Cherry-pick failed; the partial replay has been rolled back.
    #[error("failed to replay commits onto {head}: {source}")]
    Replay {
        head: String,
        #[source]
        source: GitError,
    },

    /// The remote rejected the replayed branch.
    #[error("failed to push branch {head}: {source}")]
    Publish {
        head: String,
        #[source]
        source: GitError,
    },

    #[error("failed to create pull request for {base}: {source}")]
    CreatePr {
        base: String,
        #[source]
        source: ForgeError,
    },

    #[error("failed to label pull request #{pr_number}: {source}")]
    Label {
        pr_number: u64,
        #[source]
        source: ForgeError,
    },
}

impl BackportError {
    /// Standard output captured from the underlying git process, if any.
    pub fn stdout(&self) -> &str {
        match self {
            BackportError::Setup { source, .. }
            | BackportError::Replay { source, .. }
            | BackportError::Publish { source, .. } => source.stdout(),
            _ => "",
        }
    }

    /// Standard error captured from the underlying git process, if any.
    pub fn stderr(&self) -> &str {
        match self {
            BackportError::Setup { source, .. }
            | BackportError::Replay { source, .. }
            | BackportError::Publish { source, .. } => source.stderr(),
            _ => "",
        }
    }
}
