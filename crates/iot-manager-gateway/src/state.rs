//! Gateway application state.
//!
//! This module defines the shared state that is available to all request handlers.

use std::sync::Arc;

use iot_manager_app::App;
use iot_manager_auth::IdentityDecoder;

use crate::config::GatewayConfig;

/// Shared application state for the gateway.
///
/// This struct holds references to all services needed by the HTTP handlers.
pub struct GatewayState<A, D>
where
    A: App,
    D: IdentityDecoder,
{
    /// The backend service for settings and device operations.
    pub app: Arc<A>,
    /// The decoder turning bearer tokens into identities.
    pub identity: Arc<D>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl<A, D> GatewayState<A, D>
where
    A: App,
    D: IdentityDecoder,
{
    /// Create a new gateway state.
    #[must_use]
    pub fn new(app: Arc<A>, identity: Arc<D>, config: GatewayConfig) -> Self {
        Self {
            app,
            identity,
            config,
        }
    }
}

impl<A, D> Clone for GatewayState<A, D>
where
    A: App,
    D: IdentityDecoder,
{
    fn clone(&self) -> Self {
        Self {
            app: Arc::clone(&self.app),
            identity: Arc::clone(&self.identity),
            config: self.config.clone(),
        }
    }
}
