//! # idgate-directory
//!
//! Client and resolution policies for the upstream identity directory.
//!
//! The directory operates two independent tenants ("data centers"): a
//! primary that always exists and a secondary whose presence is gated by
//! the deployment environment. This crate provides:
//!
//! - The tenant model and environment gating predicate
//! - [`DirectoryApi`]: the narrow async seam the rest of the gateway uses
//!   to reach the directory (search, login-id availability, lite
//!   registration, JWT public key retrieval)
//! - [`HttpDirectoryClient`]: the reqwest implementation of that seam
//! - [`IdentityResolver`]: cross-tenant policies — "find in either
//!   tenant" (primary precedence) and "available in all tenants"
//!   (logical AND, short-circuiting)

#![forbid(unsafe_code)]

pub mod client;
pub mod errors;
pub mod queries;
pub mod resolver;
pub mod traits;
pub mod types;

pub use client::HttpDirectoryClient;
pub use errors::{DirectoryError, Result};
pub use resolver::{secondary_tenant_supported, IdentityResolver};
pub use traits::DirectoryApi;
pub use types::*;
