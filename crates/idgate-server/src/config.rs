use anyhow::Result;
use std::net::SocketAddr;

use idgate_directory::{secondary_tenant_supported, TenantRouting};

/// Server configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_address: SocketAddr,

    /// Deployment environment name; drives secondary-tenant support
    pub environment: String,

    /// Routing and credentials for the primary tenant
    pub primary: TenantRouting,

    /// Routing for the secondary tenant, present only in environments
    /// that run one
    pub secondary: Option<TenantRouting>,

    /// Wire label of the primary tenant (v2 `dataCenter` field)
    pub primary_label: String,

    /// Wire label of the secondary tenant
    pub secondary_label: String,

    /// Maximum lite-registration batch size
    pub request_limit: usize,

    /// Whether the email-list endpoints apply the address-format check
    pub email_validation_enabled: bool,

    /// Password-setup URL template with `{clientId}`/`{uid}` placeholders
    pub password_setup_template: Option<String>,

    /// Upper bound on concurrent lifecycle hook executions
    pub lifecycle_workers: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let bind_address = std::env::var("BIND_ADDRESS")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()?;

        let environment = std::env::var("ENVIRONMENT_NAME").unwrap_or_else(|_| "local".to_string());

        let primary = TenantRouting {
            api_base: api_base_for(&require("DIRECTORY_PRIMARY_DOMAIN")?),
            api_key: require("DIRECTORY_PRIMARY_API_KEY")?,
            secret: require("DIRECTORY_PRIMARY_SECRET")?,
        };

        let secondary = if secondary_tenant_supported(&environment) {
            Some(TenantRouting {
                api_base: api_base_for(&require("DIRECTORY_SECONDARY_DOMAIN")?),
                api_key: require("DIRECTORY_SECONDARY_API_KEY")?,
                secret: require("DIRECTORY_SECONDARY_SECRET")?,
            })
        } else {
            None
        };

        let primary_label =
            std::env::var("DIRECTORY_PRIMARY_LABEL").unwrap_or_else(|_| "us".to_string());
        let secondary_label =
            std::env::var("DIRECTORY_SECONDARY_LABEL").unwrap_or_else(|_| "cn".to_string());

        let request_limit = std::env::var("REQUEST_LIMIT")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()?;

        let email_validation_enabled = std::env::var("EMAIL_VALIDATION_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()?;

        let password_setup_template = std::env::var("PASSWORD_SETUP_TEMPLATE").ok();

        let lifecycle_workers = std::env::var("LIFECYCLE_WORKERS")
            .unwrap_or_else(|_| "4".to_string())
            .parse()?;

        Ok(Config {
            bind_address,
            environment,
            primary,
            secondary,
            primary_label,
            secondary_label,
            request_limit,
            email_validation_enabled,
            password_setup_template,
            lifecycle_workers,
        })
    }
}

fn require(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| anyhow::anyhow!("{name} environment variable required"))
}

/// Build the accounts API base URL for a configured domain. A value that
/// already carries a scheme (local mock servers) is used as-is.
fn api_base_for(domain: &str) -> String {
    if domain.starts_with("http://") || domain.starts_with("https://") {
        domain.to_string()
    } else {
        format!("https://accounts.{domain}")
    }
}
