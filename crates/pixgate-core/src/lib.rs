//! Translation-and-resilience engine of pixgate.
//!
//! Requests enter through [`handler::gateway_handler`], are authenticated and
//! classified, translated into the upstream schema, sent through the
//! [`retry::ResilientClient`] and normalized back into OpenAI envelopes.

pub mod auth;
pub mod classify;
pub mod context;
pub mod core;
pub mod error;
pub mod handler;
pub mod normalize;
pub mod pipeline;
pub mod registry;
pub mod retry;
pub mod translate;
pub mod upstream_client;

pub use auth::{AuthProvider, SharedKeyAuth};
pub use context::RequestContext;
pub use core::{Core, CoreError, CoreState};
pub use error::{ErrorCode, GatewayError};
pub use registry::{ModelEntry, ModelRegistry, RegistryError};
pub use retry::{ResilientClient, RetryPolicy, UpstreamEndpoint, UpstreamOutcome};
pub use upstream_client::{
    UpstreamClient, UpstreamClientConfig, UpstreamFailure, UpstreamHttpRequest,
    UpstreamHttpResponse, UpstreamTransportErrorKind, WreqUpstreamClient,
};
