//! The narrow seam between the gateway and the identity directory.

use async_trait::async_trait;
use idgate_crypto::RsaPublicKeyParts;

use crate::errors::Result;
use crate::types::{LiteProfile, RegistrationReceipt, SearchPage, Tenant};

/// Operations the gateway consumes from the directory.
///
/// Implemented over HTTP by [`crate::HttpDirectoryClient`]; tests inject
/// fakes to exercise resolution and pipeline policies without a network.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// Execute a search query against one named tenant and return the
    /// matching page. A non-success upstream error code is surfaced as
    /// [`crate::DirectoryError::Upstream`], never as an empty page.
    async fn search(&self, query: &str, tenant: Tenant) -> Result<SearchPage>;

    /// Whether a login id is free in one named tenant.
    async fn is_login_id_available(&self, login_id: &str, tenant: Tenant) -> Result<bool>;

    /// Reserve a minimal profile-only account in the primary tenant and
    /// return the UID the directory assigned.
    async fn register_lite(&self, profile: &LiteProfile) -> Result<RegistrationReceipt>;

    /// Fetch the RSA public key the directory currently signs lifecycle
    /// webhooks with.
    async fn jwt_public_key(&self) -> Result<RsaPublicKeyParts>;
}
