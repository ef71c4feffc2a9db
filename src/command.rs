//! Command execution and orchestration for Backporter.
//!
//! A single invocation handles one pull request event end to end: resolve
//! the requested targets, set up the shared working copy once, then replay
//! each target and report any expected failure back on the original change.

/// Label-driven backport of a merged pull request.
pub mod backport;
