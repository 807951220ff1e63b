use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use pixgate_common::GlobalConfig;

use crate::auth::{AuthProvider, SharedKeyAuth};
use crate::handler::gateway_handler;
use crate::registry::{ModelRegistry, RegistryError};
use crate::retry::{ResilientClient, RetryPolicy, UpstreamEndpoint};
use crate::upstream_client::{UpstreamClientConfig, WreqUpstreamClient};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid model table: {0}")]
    Registry(#[from] RegistryError),
    #[error("build upstream client: {0}")]
    UpstreamClient(#[from] wreq::Error),
}

/// Shared, read-only state of the running gateway.
pub struct CoreState {
    pub registry: Arc<ModelRegistry>,
    pub auth: Arc<dyn AuthProvider>,
    pub upstream: ResilientClient,
}

pub struct Core {
    state: Arc<CoreState>,
}

impl Core {
    pub fn new(
        registry: Arc<ModelRegistry>,
        auth: Arc<dyn AuthProvider>,
        upstream: ResilientClient,
    ) -> Self {
        Self {
            state: Arc::new(CoreState {
                registry,
                auth,
                upstream,
            }),
        }
    }

    pub fn from_config(config: &GlobalConfig) -> Result<Self, CoreError> {
        let registry = ModelRegistry::new(config.models.clone(), config.default_model.clone())?;
        let policy = RetryPolicy::from(&config.retry);
        let client = WreqUpstreamClient::new(UpstreamClientConfig {
            proxy: config.proxy.clone(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: policy.attempt_timeout,
        })?;
        let endpoint = UpstreamEndpoint {
            url: config.upstream_url.clone(),
            origin: config.upstream_origin.clone(),
            user_agent: config.user_agent.clone(),
        };
        Ok(Self::new(
            Arc::new(registry),
            Arc::new(SharedKeyAuth::new(&config.api_key)),
            ResilientClient::new(Arc::new(client), endpoint, policy),
        ))
    }

    pub fn router(&self) -> Router {
        Router::new()
            .fallback(gateway_handler)
            .with_state(self.state.clone())
    }

    pub fn state(&self) -> Arc<CoreState> {
        self.state.clone()
    }
}
