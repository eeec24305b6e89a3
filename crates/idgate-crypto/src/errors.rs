//! Signature verification error types.

use thiserror::Error;

/// Errors raised while decoding or verifying a signed token.
///
/// These never escape [`crate::verify_signature`]; they exist so the
/// internal verification steps can use `?` and so failures can be logged
/// with their cause before the gate collapses them to `false`.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// A token segment or key component was not valid base64
    #[error("Invalid base64 segment: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    /// The RSA verification primitive rejected the key or signature
    #[error("Signature verification error: {0}")]
    Verification(#[from] jsonwebtoken::errors::Error),
}

/// Result type for signature operations
pub type Result<T> = std::result::Result<T, SignatureError>;
