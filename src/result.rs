//! Error handling and result types for Backporter.
//!
//! This module provides a unified error handling approach using the
//! `color-eyre` crate, which offers enhanced error reporting with context,
//! suggestions, and colored output.
//!
//! All fallible functions outside the typed backport-failure taxonomy (see
//! [`crate::error`]) return the `Result<T>` type defined here, ensuring
//! consistent error reporting across the application. Errors surfaced through
//! this type are *not* reported back to the original pull request as failed
//! backports; they abort the run.

use color_eyre::eyre::Result as EyreResult;

/// Standard result type used throughout Backporter.
///
/// This is a type alias for `color_eyre::eyre::Result<T>`, providing
/// colorized error output, chain-able contexts via `.wrap_err()`, and
/// optional stack traces for debugging.
pub type Result<T> = EyreResult<T>;
