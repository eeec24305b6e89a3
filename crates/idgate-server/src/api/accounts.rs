//! Batch lite-registration endpoints.

use axum::{
    extract::State,
    response::Json,
};
use serde::Deserialize;
use std::sync::Arc;

use idgate_registration::{
    assemble::{assemble_v1, assemble_v2, assemble_v3, LiteUserV1, LiteUserV2, LiteUserV3},
    LiteRegistrationRequest,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Body of the v1/v2 email-only endpoints.
#[derive(Debug, Deserialize)]
pub struct EmailList {
    pub emails: Vec<String>,
}

/// POST /v3/accounts/lite
///
/// Enhanced lite registration from a list of thin profiles.
pub async fn register_lite_v3(
    State(state): State<Arc<AppState>>,
    Json(requests): Json<Vec<LiteRegistrationRequest>>,
) -> Result<Json<Vec<LiteUserV3>>, ApiError> {
    tracing::info!("Lite account registration initiated. V3");

    let outcomes = state
        .pipeline
        .register_lite_batch(&requests)
        .await
        .map_err(|err| {
            ApiError::batch(format!(
                "An error occurred during request validation. Error description: {err}"
            ))
        })?;

    Ok(Json(assemble_v3(&outcomes)))
}

/// POST /v2/accounts/lite
///
/// Email-only registration from a list of addresses.
pub async fn register_lite_v2(
    State(state): State<Arc<AppState>>,
    Json(email_list): Json<EmailList>,
) -> Result<Json<Vec<LiteUserV2>>, ApiError> {
    tracing::info!("Email only registration initiated.");

    let outcomes = state
        .pipeline
        .register_email_batch(&email_list.emails)
        .await?;

    Ok(Json(assemble_v2(&outcomes)))
}

/// POST /accounts/email-only/users
///
/// Deprecated v1 shape of the email-only endpoint, kept for clients
/// that predate the v2 response fields.
pub async fn register_lite_v1(
    State(state): State<Arc<AppState>>,
    Json(email_list): Json<EmailList>,
) -> Result<Json<Vec<LiteUserV1>>, ApiError> {
    tracing::info!("Email only registration initiated.");

    let outcomes = state
        .pipeline
        .register_email_batch(&email_list.emails)
        .await?;

    Ok(Json(assemble_v1(&outcomes)))
}
