//! Directory client error types.

use thiserror::Error;

use crate::types::Tenant;

/// Result type alias for directory operations
pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Errors raised while talking to the identity directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The directory answered with a non-success error code. The call
    /// result is not trustworthy and must never be read as "not found".
    #[error("Directory error {code}: {message}")]
    Upstream { code: i32, message: String },

    /// A call was routed to a tenant this process has no routing for
    #[error("No routing configured for tenant {0:?}")]
    TenantNotConfigured(Tenant),

    /// Transport-level failure (connect, timeout, body decode)
    #[error("Directory request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl DirectoryError {
    /// Upstream error code when the failure originated in the directory.
    pub fn upstream_code(&self) -> Option<i32> {
        match self {
            DirectoryError::Upstream { code, .. } => Some(*code),
            _ => None,
        }
    }
}
