//! HTTP client for communicating with the device twin service.
//!
//! The device twin service owns the connection to the managed-device
//! platform. This module forwards device, twin and module requests to it,
//! scoped to a tenant.

use async_trait::async_trait;
use iot_manager_core::{Device, DeviceId, DeviceTwin, Module, TwinUpdate};
use reqwest::header::IF_MATCH;
use reqwest::{RequestBuilder, Url};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::types::{TwinBackendConfig, TwinScope};

/// Header carrying the tenant id on backend requests.
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Header carrying the tenant's hub connection string on backend requests.
pub const CONNECTION_STRING_HEADER: &str = "x-iothub-connection-string";

/// Trait for device twin backend communication.
///
/// This trait abstracts the device twin service, allowing for
/// mock implementations in tests.
#[async_trait]
pub trait TwinBackend: Send + Sync {
    /// Get a device's identity record.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    async fn get_device(&self, scope: &TwinScope, device_id: &DeviceId) -> Result<Device>;

    /// Get a device's twin.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    async fn get_twin(&self, scope: &TwinScope, device_id: &DeviceId) -> Result<DeviceTwin>;

    /// Replace the tags and desired properties of a device twin.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    async fn replace_twin(
        &self,
        scope: &TwinScope,
        device_id: &DeviceId,
        update: &TwinUpdate,
    ) -> Result<()>;

    /// Merge tags and desired properties into a device twin.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    async fn merge_twin(
        &self,
        scope: &TwinScope,
        device_id: &DeviceId,
        update: &TwinUpdate,
    ) -> Result<()>;

    /// List the modules of a device.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    async fn list_modules(&self, scope: &TwinScope, device_id: &DeviceId) -> Result<Vec<Module>>;

    /// Check that the service is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or unhealthy.
    async fn ping(&self) -> Result<()>;
}

/// HTTP client for the device twin service.
#[derive(Debug, Clone)]
pub struct HttpTwinBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTwinBackend {
    /// Create a new device twin client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be created.
    pub fn new(config: TwinBackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("failed to create HTTP client: {e}")))?;

        Self::with_client(client, &config.base_url)
    }

    /// Create a new device twin client with a custom reqwest client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Internal(format!("invalid device twin backend URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Internal(format!(
                "invalid device twin backend URL: {base_url}"
            )));
        }

        Ok(Self { client, base_url })
    }

    /// Build a URL below the base URL from unescaped path segments.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Attach the tenant scope, send, and turn non-success statuses into errors.
    async fn send(&self, request: RequestBuilder, scope: &TwinScope) -> Result<reqwest::Response> {
        let response = request
            .header(TENANT_HEADER, scope.tenant.as_str())
            .header(CONNECTION_STRING_HEADER, &scope.connection_string)
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("request failed: {e}")))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::error_from(response).await)
        }
    }

    async fn error_from(response: reqwest::Response) -> AppError {
        let status = response.status();
        let error = response
            .json::<ErrorResponse>()
            .await
            .map(|e| e.error)
            .unwrap_or_else(|_| format!("service returned status {status}"));

        tracing::warn!(status = %status, error = %error, "Device twin backend request failed");
        AppError::Backend(error)
    }

    async fn write_twin(
        &self,
        request: RequestBuilder,
        scope: &TwinScope,
        device_id: &DeviceId,
        update: &TwinUpdate,
    ) -> Result<()> {
        let mut request = request.json(update);
        if let Some(etag) = &update.etag {
            request = request.header(IF_MATCH, etag);
        }

        self.send(request, scope).await?;
        tracing::debug!(tenant_id = %scope.tenant, device_id = %device_id, "Updated device twin");
        Ok(())
    }
}

/// Error response from the device twin service.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[async_trait]
impl TwinBackend for HttpTwinBackend {
    async fn get_device(&self, scope: &TwinScope, device_id: &DeviceId) -> Result<Device> {
        let url = self.url(&["devices", device_id.as_str()]);
        self.send(self.client.get(url), scope)
            .await?
            .json::<Device>()
            .await
            .map_err(|e| AppError::Backend(format!("failed to parse response: {e}")))
    }

    async fn get_twin(&self, scope: &TwinScope, device_id: &DeviceId) -> Result<DeviceTwin> {
        let url = self.url(&["devices", device_id.as_str(), "twin"]);
        self.send(self.client.get(url), scope)
            .await?
            .json::<DeviceTwin>()
            .await
            .map_err(|e| AppError::Backend(format!("failed to parse response: {e}")))
    }

    async fn replace_twin(
        &self,
        scope: &TwinScope,
        device_id: &DeviceId,
        update: &TwinUpdate,
    ) -> Result<()> {
        let url = self.url(&["devices", device_id.as_str(), "twin"]);
        self.write_twin(self.client.put(url), scope, device_id, update)
            .await
    }

    async fn merge_twin(
        &self,
        scope: &TwinScope,
        device_id: &DeviceId,
        update: &TwinUpdate,
    ) -> Result<()> {
        let url = self.url(&["devices", device_id.as_str(), "twin"]);
        self.write_twin(self.client.patch(url), scope, device_id, update)
            .await
    }

    async fn list_modules(&self, scope: &TwinScope, device_id: &DeviceId) -> Result<Vec<Module>> {
        let url = self.url(&["devices", device_id.as_str(), "modules"]);
        self.send(self.client.get(url), scope)
            .await?
            .json::<Vec<Module>>()
            .await
            .map_err(|e| AppError::Backend(format!("failed to parse response: {e}")))
    }

    async fn ping(&self) -> Result<()> {
        let response = self
            .client
            .get(self.url(&["health"]))
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("request failed: {e}")))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from(response).await)
        }
    }
}

/// A device twin backend for deployments without a device twin service.
///
/// Every device operation fails; health checks succeed so the gateway can
/// still serve tenant settings.
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredTwinBackend;

impl UnconfiguredTwinBackend {
    /// Create a new unconfigured backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn unavailable(device_id: &DeviceId) -> AppError {
        tracing::warn!(
            device_id = %device_id,
            "UnconfiguredTwinBackend: device operation called but no twin backend configured"
        );
        AppError::Backend("device twin backend not configured".to_string())
    }
}

#[async_trait]
impl TwinBackend for UnconfiguredTwinBackend {
    async fn get_device(&self, _scope: &TwinScope, device_id: &DeviceId) -> Result<Device> {
        Err(Self::unavailable(device_id))
    }

    async fn get_twin(&self, _scope: &TwinScope, device_id: &DeviceId) -> Result<DeviceTwin> {
        Err(Self::unavailable(device_id))
    }

    async fn replace_twin(
        &self,
        _scope: &TwinScope,
        device_id: &DeviceId,
        _update: &TwinUpdate,
    ) -> Result<()> {
        Err(Self::unavailable(device_id))
    }

    async fn merge_twin(
        &self,
        _scope: &TwinScope,
        device_id: &DeviceId,
        _update: &TwinUpdate,
    ) -> Result<()> {
        Err(Self::unavailable(device_id))
    }

    async fn list_modules(&self, _scope: &TwinScope, device_id: &DeviceId) -> Result<Vec<Module>> {
        Err(Self::unavailable(device_id))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
