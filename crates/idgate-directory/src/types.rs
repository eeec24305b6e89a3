//! Type definitions for the directory client.

use serde::{Deserialize, Serialize};

/// Upstream success code: the directory reports errors in-band with an
/// `errorCode` field, where zero means the call succeeded.
pub const DIRECTORY_SUCCESS_CODE: i32 = 0;

/// One independently addressable instance of the identity directory.
///
/// The primary tenant always exists; the secondary is optional and gated
/// by the deployment environment (see
/// [`crate::resolver::secondary_tenant_supported`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tenant {
    Primary,
    Secondary,
}

/// Routing and credentials for one tenant.
#[derive(Debug, Clone)]
pub struct TenantRouting {
    /// Base URL of the tenant's accounts API, e.g.
    /// `https://accounts.us1.example-directory.com`
    pub api_base: String,
    /// Site API key for this tenant
    pub api_key: String,
    /// Secret paired with the API key
    pub secret: String,
}

/// Which tenants exist for this process. Fixed for the process lifetime.
#[derive(Debug, Clone, Copy)]
pub struct TenantTopology {
    pub secondary_supported: bool,
}

/// A resolved account as seen by the directory. Read-only projection,
/// never persisted locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    pub uid: String,
    pub is_registered: bool,
    pub is_active: bool,
    pub username: Option<String>,
    pub email: Option<String>,
}

/// An account entry exactly as the directory's search API shapes it.
/// Registration and activity flags are nullable upstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountEntry {
    #[serde(rename = "UID")]
    pub uid: String,
    #[serde(default)]
    pub is_registered: Option<bool>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub profile: Option<AccountProfile>,
}

/// Minimal profile projection of a search hit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountProfile {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl AccountEntry {
    /// Collapse the nullable upstream flags into the read-only record
    /// the rest of the gateway works with.
    pub fn into_record(self) -> IdentityRecord {
        let profile = self.profile.unwrap_or_default();
        IdentityRecord {
            uid: self.uid,
            is_registered: self.is_registered.unwrap_or(false),
            is_active: self.is_active.unwrap_or(false),
            username: profile.username,
            email: profile.email,
        }
    }
}

/// One page of search results, upstream-shaped.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub error_code: i32,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub status_code: i32,
    #[serde(default)]
    pub status_reason: String,
    #[serde(default)]
    pub results: Vec<AccountEntry>,
    #[serde(default)]
    pub total_count: i64,
}

/// A search match together with the tenant that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub record: IdentityRecord,
    pub tenant: Tenant,
}

/// Reply of the login-id availability check.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReply {
    #[serde(default)]
    pub error_code: i32,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub is_available: bool,
}

/// Minimal profile-only document written when reserving a lite account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiteProfile {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub inviter_email: Option<String>,
    pub location: Option<String>,
}

/// Reply of the two-step lite registration flow.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReply {
    #[serde(rename = "UID", default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub error_code: i32,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub status_code: i32,
    #[serde(default)]
    pub status_reason: String,
    #[serde(default)]
    pub reg_token: Option<String>,
    #[serde(default)]
    pub validation_errors: Vec<ValidationError>,
}

/// One field-level validation failure reported by the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    #[serde(default)]
    pub error_code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub field_name: String,
}

/// Outcome of a successful lite registration: the UID the directory
/// assigned to the reserved account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReceipt {
    pub uid: String,
}

/// Reply of the JWT public key endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtKeyReply {
    #[serde(default)]
    pub error_code: i32,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub status_reason: String,
    #[serde(default)]
    pub n: String,
    #[serde(default)]
    pub e: String,
}
