//! Versioned projection of pipeline outcomes onto wire shapes.
//!
//! Pure and side-effect free: the projectors only rearrange what the
//! pipeline already resolved, they never re-query the directory.

use serde::Serialize;

use crate::types::{
    LiteRegistrationOutcome, RESPONSE_CODE_ALREADY_EXISTS, RESPONSE_CODE_BAD_REQUEST,
    RESPONSE_CODE_SUCCESS,
};

const MESSAGE_OK: &str = "OK";
const MESSAGE_ALREADY_EXISTS: &str = "Account already exists.";

/// v1 wire shape: a single `registered` flag, no activity split.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiteUserV1 {
    pub uid: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub registered: Option<bool>,
    pub is_available: Option<bool>,
    pub response_code: i32,
    pub response_message: String,
}

/// v2 wire shape: split `isRegistered`/`isActive` plus the owning data
/// center label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiteUserV2 {
    pub uid: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub is_registered: Option<bool>,
    pub is_active: Option<bool>,
    pub is_available: Option<bool>,
    pub data_center: Option<String>,
    pub response_code: i32,
    pub response_message: String,
}

/// v3 wire shape: adds the password-setup link for fresh registrations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiteUserV3 {
    pub uid: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub is_available: Option<bool>,
    pub password_setup_link: Option<String>,
    pub response_code: i32,
    pub response_message: String,
}

impl LiteUserV1 {
    /// v1 keeps the v2 field subset and, for backwards compatibility,
    /// folds the already-exists code into plain success.
    pub fn from_outcome(outcome: &LiteRegistrationOutcome) -> Self {
        let v2 = LiteUserV2::from_outcome(outcome);

        let response_code = if v2.response_code == RESPONSE_CODE_ALREADY_EXISTS {
            RESPONSE_CODE_SUCCESS
        } else {
            v2.response_code
        };

        Self {
            uid: v2.uid,
            username: v2.username,
            email: v2.email,
            registered: v2.is_registered,
            is_available: v2.is_available,
            response_code,
            response_message: v2.response_message,
        }
    }
}

impl LiteUserV2 {
    pub fn from_outcome(outcome: &LiteRegistrationOutcome) -> Self {
        match outcome {
            LiteRegistrationOutcome::ExistingAccount {
                uid,
                username,
                email,
                is_registered,
                is_active,
                data_center,
                ..
            } => Self {
                uid: Some(uid.clone()),
                username: username.clone(),
                email: email.clone(),
                is_registered: Some(*is_registered),
                is_active: Some(*is_active),
                is_available: Some(false),
                data_center: Some(data_center.clone()),
                response_code: RESPONSE_CODE_ALREADY_EXISTS,
                response_message: MESSAGE_ALREADY_EXISTS.to_string(),
            },
            LiteRegistrationOutcome::NewlyRegistered {
                uid,
                email,
                data_center,
                ..
            } => Self {
                uid: Some(uid.clone()),
                username: None,
                email: Some(email.clone()),
                is_registered: Some(false),
                is_active: Some(false),
                is_available: Some(true),
                data_center: Some(data_center.clone()),
                response_code: RESPONSE_CODE_SUCCESS,
                response_message: MESSAGE_OK.to_string(),
            },
            LiteRegistrationOutcome::InvalidInput { email, message } => Self {
                uid: None,
                username: None,
                email: email.clone(),
                is_registered: None,
                is_active: None,
                is_available: None,
                data_center: None,
                response_code: RESPONSE_CODE_BAD_REQUEST,
                response_message: message.clone(),
            },
            LiteRegistrationOutcome::UpstreamError {
                email,
                code,
                message,
            } => Self {
                uid: None,
                username: None,
                email: email.clone(),
                is_registered: None,
                is_active: None,
                is_available: None,
                data_center: None,
                response_code: *code,
                response_message: message.clone(),
            },
        }
    }
}

impl LiteUserV3 {
    pub fn from_outcome(outcome: &LiteRegistrationOutcome) -> Self {
        match outcome {
            LiteRegistrationOutcome::ExistingAccount {
                uid,
                username,
                email,
                ..
            } => Self {
                uid: Some(uid.clone()),
                username: username.clone(),
                email: email.clone(),
                is_available: Some(false),
                // Existing accounts already hold credentials; an empty
                // link keeps the field present for v3 consumers.
                password_setup_link: Some(String::new()),
                response_code: RESPONSE_CODE_ALREADY_EXISTS,
                response_message: MESSAGE_ALREADY_EXISTS.to_string(),
            },
            LiteRegistrationOutcome::NewlyRegistered {
                uid,
                email,
                password_setup_link,
                ..
            } => Self {
                uid: Some(uid.clone()),
                username: None,
                email: Some(email.clone()),
                is_available: Some(true),
                password_setup_link: password_setup_link.clone(),
                response_code: RESPONSE_CODE_SUCCESS,
                response_message: MESSAGE_OK.to_string(),
            },
            LiteRegistrationOutcome::InvalidInput { email, message } => Self {
                uid: None,
                username: None,
                email: email.clone(),
                is_available: None,
                password_setup_link: None,
                response_code: RESPONSE_CODE_BAD_REQUEST,
                response_message: message.clone(),
            },
            LiteRegistrationOutcome::UpstreamError {
                email,
                code,
                message,
            } => Self {
                uid: None,
                username: None,
                email: email.clone(),
                is_available: None,
                password_setup_link: None,
                response_code: *code,
                response_message: message.clone(),
            },
        }
    }
}

/// Project a whole batch, preserving order.
pub fn assemble_v1(outcomes: &[LiteRegistrationOutcome]) -> Vec<LiteUserV1> {
    outcomes.iter().map(LiteUserV1::from_outcome).collect()
}

/// Project a whole batch, preserving order.
pub fn assemble_v2(outcomes: &[LiteRegistrationOutcome]) -> Vec<LiteUserV2> {
    outcomes.iter().map(LiteUserV2::from_outcome).collect()
}

/// Project a whole batch, preserving order.
pub fn assemble_v3(outcomes: &[LiteRegistrationOutcome]) -> Vec<LiteUserV3> {
    outcomes.iter().map(LiteUserV3::from_outcome).collect()
}
