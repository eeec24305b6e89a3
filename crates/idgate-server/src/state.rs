use anyhow::Result;
use std::sync::Arc;

use idgate_directory::{HttpDirectoryClient, TenantTopology};
use idgate_registration::{LiteRegistrationPipeline, PipelineConfig};

use crate::config::Config;
use crate::lifecycle::{LifecycleFanout, LogOnlyLifecycleHooks};

/// Application state shared across all handlers
pub struct AppState {
    /// Server configuration (for future use in handlers)
    #[allow(dead_code)]
    pub config: Config,
    /// Direct directory access (webhook key retrieval)
    pub directory: Arc<HttpDirectoryClient>,
    pub pipeline: LiteRegistrationPipeline<HttpDirectoryClient>,
    pub lifecycle: LifecycleFanout,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let directory = Arc::new(HttpDirectoryClient::new(
            config.primary.clone(),
            config.secondary.clone(),
        )?);

        let topology = TenantTopology {
            secondary_supported: config.secondary.is_some(),
        };

        let pipeline = LiteRegistrationPipeline::new(
            directory.clone(),
            topology,
            PipelineConfig {
                request_limit: config.request_limit,
                email_validation_enabled: config.email_validation_enabled,
                password_setup_template: config.password_setup_template.clone(),
                primary_label: config.primary_label.clone(),
                secondary_label: config.secondary_label.clone(),
            },
        );

        let lifecycle = LifecycleFanout::new(
            Arc::new(LogOnlyLifecycleHooks),
            config.lifecycle_workers,
        );

        Ok(AppState {
            config,
            directory,
            pipeline,
            lifecycle,
        })
    }
}
