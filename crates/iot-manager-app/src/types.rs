//! Types used by the service layer.

use std::time::Duration;

use iot_manager_core::TenantId;

/// The tenant context of a device twin operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwinScope {
    /// Tenant that owns the device.
    pub tenant: TenantId,
    /// The tenant's device hub connection string.
    pub connection_string: String,
}

/// Configuration for the HTTP device twin backend.
#[derive(Debug, Clone)]
pub struct TwinBackendConfig {
    /// Base URL of the device twin service (e.g., `http://twin-service:8080`).
    pub base_url: String,
    /// Timeout for a whole request.
    pub request_timeout: Duration,
    /// Timeout for establishing a connection.
    pub connect_timeout: Duration,
}

impl TwinBackendConfig {
    /// Create a configuration with default timeouts.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }
}
