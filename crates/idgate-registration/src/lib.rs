//! # idgate-registration
//!
//! Batch lite-registration pipeline for the idgate gateway.
//!
//! A "lite" account is a minimal directory record (email plus an optional
//! thin profile) created to reserve an identity ahead of full
//! registration. Given a bounded batch of requests the pipeline decides,
//! per item, whether an account already exists in either tenant, creates
//! a lite account when none does, and isolates every per-item failure so
//! one bad request never poisons its siblings. The versioned projectors
//! map each outcome onto the wire shape of the API version that asked.
//!
//! Output order always equals input order, item for item.

#![forbid(unsafe_code)]

pub mod assemble;
pub mod errors;
pub mod pipeline;
pub mod types;
pub mod validation;

pub use assemble::{LiteUserV1, LiteUserV2, LiteUserV3};
pub use errors::BatchError;
pub use pipeline::{LiteRegistrationPipeline, PipelineConfig};
pub use types::{LiteRegistrationOutcome, LiteRegistrationRequest};
