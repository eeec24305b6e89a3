//! Cross-tenant identity resolution policies.

use std::sync::Arc;

use crate::errors::Result;
use crate::queries;
use crate::traits::DirectoryApi;
use crate::types::{AccountEntry, IdentityRecord, SearchHit, Tenant, TenantTopology};

/// Environment tags whose deployments run a secondary tenant.
const SECONDARY_TENANT_ENVIRONMENTS: [&str; 3] = ["qa1", "qa4", "prod"];

/// Whether the named deployment environment runs a secondary tenant.
///
/// Pure function of the environment name; used once at startup to build
/// the [`TenantTopology`] the resolver is configured with, so the
/// resolver itself stays environment-agnostic.
pub fn secondary_tenant_supported(env: &str) -> bool {
    let env = env.to_lowercase();
    SECONDARY_TENANT_ENVIRONMENTS
        .iter()
        .any(|tag| env.contains(tag))
}

/// Composes per-tenant directory calls into cross-tenant policies.
pub struct IdentityResolver<A> {
    api: Arc<A>,
    topology: TenantTopology,
}

impl<A: DirectoryApi> IdentityResolver<A> {
    pub fn new(api: Arc<A>, topology: TenantTopology) -> Self {
        Self { api, topology }
    }

    /// Find an identifier in either tenant, primary first.
    ///
    /// The primary tenant takes precedence: when it has a match the
    /// secondary is never queried. The secondary is consulted only when
    /// the topology supports it and the primary returned zero matches.
    /// Upstream errors propagate; they are never read as "not found".
    pub async fn find_in_any_tenant(&self, identifier: &str) -> Result<Option<SearchHit>> {
        let query = queries::account_lookup(identifier);

        let page = self.api.search(&query, Tenant::Primary).await?;
        if let Some(record) = pick_record(page.results) {
            return Ok(Some(SearchHit {
                record,
                tenant: Tenant::Primary,
            }));
        }

        if !self.topology.secondary_supported {
            return Ok(None);
        }

        let page = self.api.search(&query, Tenant::Secondary).await?;
        Ok(pick_record(page.results).map(|record| SearchHit {
            record,
            tenant: Tenant::Secondary,
        }))
    }

    /// Whether a login id is free in every tenant this process knows.
    ///
    /// Logical AND across tenants, short-circuiting: a collision in the
    /// primary answers `false` without querying the secondary.
    pub async fn is_available_in_all_tenants(&self, login_id: &str) -> Result<bool> {
        let available = self
            .api
            .is_login_id_available(login_id, Tenant::Primary)
            .await?;
        if !available {
            return Ok(false);
        }

        if self.topology.secondary_supported {
            return self
                .api
                .is_login_id_available(login_id, Tenant::Secondary)
                .await;
        }

        Ok(true)
    }
}

/// Pick the record a page resolves to: the first fully-registered
/// account, else the first result.
fn pick_record(results: Vec<AccountEntry>) -> Option<IdentityRecord> {
    let registered = results
        .iter()
        .position(|entry| entry.is_registered == Some(true));

    match registered {
        Some(index) => results.into_iter().nth(index).map(AccountEntry::into_record),
        None => results.into_iter().next().map(AccountEntry::into_record),
    }
}
