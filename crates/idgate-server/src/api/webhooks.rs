//! Directory lifecycle webhook ingress.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use std::sync::Arc;

use idgate_crypto::verify_signature;

use crate::lifecycle::LifecycleEvent;
use crate::state::AppState;

/// Header carrying the directory's signed token.
pub const SIGNATURE_HEADER: &str = "x-gigya-sig-jwt";

/// Webhook body: a list of lifecycle events.
#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub events: Vec<WebhookEventBody>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEventBody {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: WebhookEventData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEventData {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub new_uid: Option<String>,
}

/// POST /webhooks/lifecycle
///
/// Verifies that the notification originates from the directory before
/// any side effect fires. Every failure mode — missing header, key
/// retrieval failure, bad signature, unparseable body — acknowledges
/// with `200 OK` and performs no processing: the caller cannot tell a
/// verification failure from a verification error, and the directory's
/// retry suppression expects a 2xx either way.
pub async fn lifecycle_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> StatusCode {
    let Some(signature) = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
    else {
        tracing::error!("Lifecycle webhook received without a signature header.");
        return StatusCode::OK;
    };

    let key = match state.directory.jwt_public_key().await {
        Ok(key) => key,
        Err(err) => {
            tracing::error!("Could not retrieve the directory signing key: {err}");
            return StatusCode::OK;
        }
    };

    if !verify_signature(signature, &key) {
        tracing::error!("Invalid lifecycle webhook signature.");
        return StatusCode::OK;
    }

    let envelope: WebhookEnvelope = match serde_json::from_str(&body) {
        Ok(envelope) => envelope,
        Err(err) => {
            tracing::error!("Unreadable lifecycle webhook body: {err}");
            return StatusCode::OK;
        }
    };

    if envelope.events.is_empty() {
        tracing::error!("No webhook events found in request.");
        return StatusCode::OK;
    }

    for event in envelope.events {
        match LifecycleEvent::from_webhook(&event.event_type, event.data.uid, event.data.new_uid) {
            Some(event) => state.lifecycle.dispatch(event),
            None => {
                tracing::warn!(
                    "Lifecycle webhook event type was not recognized: {}",
                    event.event_type
                );
            }
        }
    }

    StatusCode::OK
}
