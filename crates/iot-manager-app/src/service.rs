//! Management service implementation.
//!
//! This module provides the `App` trait consumed by the HTTP gateway and the
//! `ManagerService` implementation that combines the settings store with a
//! device twin backend.

use std::sync::Arc;

use async_trait::async_trait;
use iot_manager_core::{Device, DeviceId, DeviceTwin, Module, Settings, TenantId, TwinUpdate};
use iot_manager_store::Store;

use crate::error::{AppError, Result};
use crate::twin_client::TwinBackend;
use crate::types::TwinScope;

/// Trait defining the management operations.
///
/// Every operation is scoped to a tenant. Callers are responsible for
/// authenticating the tenant and validating payloads before calling in.
#[async_trait]
pub trait App: Send + Sync {
    // =========================================================================
    // Operational
    // =========================================================================

    /// Check that every dependency of the service is reachable.
    ///
    /// # Errors
    ///
    /// Returns the first dependency failure.
    async fn health_check(&self) -> Result<()>;

    // =========================================================================
    // Tenant Settings
    // =========================================================================

    /// Get the settings of a tenant.
    ///
    /// A tenant that never stored settings gets empty settings.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the settings cannot be read.
    async fn get_settings(&self, tenant: &TenantId) -> Result<Settings>;

    /// Replace the settings of a tenant.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the settings cannot be written.
    async fn set_settings(&self, tenant: &TenantId, settings: Settings) -> Result<()>;

    // =========================================================================
    // Devices
    // =========================================================================

    /// Get a device's identity record.
    async fn get_device(&self, tenant: &TenantId, device_id: &DeviceId) -> Result<Device>;

    /// Get a device's twin.
    async fn get_device_twin(&self, tenant: &TenantId, device_id: &DeviceId)
        -> Result<DeviceTwin>;

    /// Replace a device twin's tags and desired properties.
    async fn set_device_twin(
        &self,
        tenant: &TenantId,
        device_id: &DeviceId,
        update: TwinUpdate,
    ) -> Result<()>;

    /// Merge tags and desired properties into a device twin.
    async fn update_device_twin(
        &self,
        tenant: &TenantId,
        device_id: &DeviceId,
        update: TwinUpdate,
    ) -> Result<()>;

    /// List the modules of a device.
    async fn get_device_modules(
        &self,
        tenant: &TenantId,
        device_id: &DeviceId,
    ) -> Result<Vec<Module>>;
}

/// The management service implementation.
pub struct ManagerService<S: Store, T: TwinBackend> {
    store: Arc<S>,
    twins: Arc<T>,
}

impl<S: Store, T: TwinBackend> ManagerService<S, T> {
    /// Create a new management service.
    #[must_use]
    pub fn new(store: Arc<S>, twins: Arc<T>) -> Self {
        Self { store, twins }
    }

    /// Resolve the twin backend scope of a tenant.
    ///
    /// Device operations need the tenant's connection string; a tenant
    /// without one cannot reach its devices.
    fn scope(&self, tenant: &TenantId) -> Result<TwinScope> {
        let connection_string = self
            .store
            .get_settings(tenant)?
            .map(|record| record.settings.connection_string)
            .filter(|cs| !cs.is_empty())
            .ok_or(AppError::NoConnectionString)?;

        Ok(TwinScope {
            tenant: tenant.clone(),
            connection_string,
        })
    }
}

#[async_trait]
impl<S: Store + 'static, T: TwinBackend + 'static> App for ManagerService<S, T> {
    async fn health_check(&self) -> Result<()> {
        self.store.ping()?;
        self.twins.ping().await
    }

    async fn get_settings(&self, tenant: &TenantId) -> Result<Settings> {
        let settings = self
            .store
            .get_settings(tenant)?
            .map(|record| record.settings)
            .unwrap_or_default();
        Ok(settings)
    }

    async fn set_settings(&self, tenant: &TenantId, settings: Settings) -> Result<()> {
        self.store.put_settings(tenant, &settings)?;

        tracing::info!(
            tenant_id = %tenant,
            has_connection_string = !settings.is_empty(),
            "Updated tenant settings"
        );
        Ok(())
    }

    async fn get_device(&self, tenant: &TenantId, device_id: &DeviceId) -> Result<Device> {
        let scope = self.scope(tenant)?;
        self.twins.get_device(&scope, device_id).await
    }

    async fn get_device_twin(
        &self,
        tenant: &TenantId,
        device_id: &DeviceId,
    ) -> Result<DeviceTwin> {
        let scope = self.scope(tenant)?;
        self.twins.get_twin(&scope, device_id).await
    }

    async fn set_device_twin(
        &self,
        tenant: &TenantId,
        device_id: &DeviceId,
        update: TwinUpdate,
    ) -> Result<()> {
        let scope = self.scope(tenant)?;
        self.twins.replace_twin(&scope, device_id, &update).await?;

        tracing::info!(tenant_id = %tenant, device_id = %device_id, "Replaced device twin");
        Ok(())
    }

    async fn update_device_twin(
        &self,
        tenant: &TenantId,
        device_id: &DeviceId,
        update: TwinUpdate,
    ) -> Result<()> {
        let scope = self.scope(tenant)?;
        self.twins.merge_twin(&scope, device_id, &update).await?;

        tracing::info!(tenant_id = %tenant, device_id = %device_id, "Merged device twin");
        Ok(())
    }

    async fn get_device_modules(
        &self,
        tenant: &TenantId,
        device_id: &DeviceId,
    ) -> Result<Vec<Module>> {
        let scope = self.scope(tenant)?;
        self.twins.list_modules(&scope, device_id).await
    }
}
