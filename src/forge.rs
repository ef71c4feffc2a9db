//! Hosting-platform API client for pull requests, comments, and labels.
//!
//! Provides token-based authentication and the handful of platform
//! operations the backport run needs, behind a trait so the orchestration
//! and replay layers can be tested against mocks.

/// Configuration for the platform connection.
pub mod config;

/// GitHub API client implementation for GitHub.com and Enterprise.
pub mod github;

/// Common trait for platform abstraction.
pub mod traits;

/// Shared request types for platform operations.
pub mod types;
