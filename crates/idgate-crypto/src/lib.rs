//! # idgate-crypto
//!
//! Signature verification primitives for the idgate gateway.
//!
//! The only cryptographic duty of the gateway is deciding whether a
//! lifecycle webhook genuinely originates from the identity directory.
//! The directory signs each notification with an RSA key and publishes
//! the public half as a base64url `(n, e)` pair; this crate verifies the
//! compact signed token against that pair.
//!
//! ## Properties
//!
//! - Pure: no I/O, no clock, no randomness
//! - Fail-closed: every malformed input verifies as `false`, never panics
//! - No unsafe code

#![forbid(unsafe_code)]

pub mod errors;
pub mod signatures;

pub use errors::SignatureError;
pub use signatures::{verify_signature, RsaPublicKeyParts};
