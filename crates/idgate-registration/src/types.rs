//! Request and outcome types for the lite-registration pipeline.

use idgate_directory::{LiteProfile, Tenant};
use serde::{Deserialize, Serialize};

/// Success code used in versioned responses.
pub const RESPONSE_CODE_SUCCESS: i32 = 200;

/// Response code marking "an account with this login id already exists".
/// Distinct from any HTTP status so clients can tell it apart from OK.
pub const RESPONSE_CODE_ALREADY_EXISTS: i32 = 4001;

/// Response code for a per-item validation failure.
pub const RESPONSE_CODE_BAD_REQUEST: i32 = 400;

/// Response code for unclassified per-item failures.
pub const RESPONSE_CODE_GENERIC_ERROR: i32 = 500;

/// Fixed message for unclassified per-item failures; raw error detail is
/// logged, never returned to the caller.
pub const GENERIC_ERROR_MESSAGE: &str =
    "Something went wrong, please contact the system administrator.";

/// One item of a lite-registration batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LiteRegistrationRequest {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub inviter_email: Option<String>,
    pub location: Option<String>,
    pub client_id: Option<String>,
}

impl LiteRegistrationRequest {
    /// A request carrying only an email, as produced by the v1/v2
    /// email-list endpoints.
    pub fn email_only(email: &str) -> Self {
        Self {
            email: email.to_string(),
            ..Self::default()
        }
    }

    /// The profile document the registration primitive writes upstream.
    pub fn to_profile(&self) -> LiteProfile {
        LiteProfile {
            email: self.email.trim().to_string(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            inviter_email: self.inviter_email.clone(),
            location: self.location.clone(),
        }
    }
}

/// Result of processing one batch item. Created once by the pipeline,
/// never mutated, consumed by the versioned projectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteRegistrationOutcome {
    /// The identifier already resolves to an account in some tenant.
    ExistingAccount {
        uid: String,
        username: Option<String>,
        email: Option<String>,
        is_registered: bool,
        is_active: bool,
        /// Tenant that owns the record.
        tenant: Tenant,
        /// Wire label of that tenant, for the v2 `dataCenter` field.
        data_center: String,
    },
    /// No tenant knew the identifier; a lite account was reserved.
    NewlyRegistered {
        uid: String,
        email: String,
        data_center: String,
        password_setup_link: Option<String>,
    },
    /// The item failed validation; siblings proceed.
    InvalidInput {
        email: Option<String>,
        message: String,
    },
    /// The directory rejected the item's search or registration call.
    UpstreamError {
        email: Option<String>,
        code: i32,
        message: String,
    },
}
