//! Batch-level error types.

use thiserror::Error;

/// Structural violations that reject a whole batch before any network
/// call. Per-item failures never surface here; they become outcome
/// values instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("No users requested.")]
    Empty,

    #[error("Requested users exceed request limit: {0}.")]
    LimitExceeded(usize),

    #[error("Email list has null or empty values.")]
    BlankEmail,
}
