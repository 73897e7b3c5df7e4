//! Device, device twin and module endpoints.
//!
//! Every operation is forwarded to the backend scoped to the caller's tenant.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use iot_manager_app::App;
use iot_manager_auth::IdentityDecoder;
use iot_manager_core::{Device, DeviceTwin, Module, TwinUpdate};

use crate::auth::ManagementUser;
use crate::error::ApiError;
use crate::state::GatewayState;
use crate::validation::{DevicePath, ValidJson};

/// Get a device.
///
/// # Errors
///
/// Returns an error if the device id is malformed or the backend operation fails.
pub async fn get_device<A, D>(
    State(state): State<Arc<GatewayState<A, D>>>,
    user: ManagementUser,
    DevicePath(device_id): DevicePath,
) -> Result<Json<Device>, ApiError>
where
    A: App + 'static,
    D: IdentityDecoder + 'static,
{
    let device = state.app.get_device(&user.tenant, &device_id).await?;
    Ok(Json(device))
}

/// Get a device's twin.
///
/// # Errors
///
/// Returns an error if the device id is malformed or the backend operation fails.
pub async fn get_device_twin<A, D>(
    State(state): State<Arc<GatewayState<A, D>>>,
    user: ManagementUser,
    DevicePath(device_id): DevicePath,
) -> Result<Json<DeviceTwin>, ApiError>
where
    A: App + 'static,
    D: IdentityDecoder + 'static,
{
    let twin = state.app.get_device_twin(&user.tenant, &device_id).await?;
    Ok(Json(twin))
}

/// Replace a device twin's tags and desired properties.
///
/// # Errors
///
/// Returns `400` if the device id or body is malformed, or an error if the
/// backend operation fails.
pub async fn set_device_twin<A, D>(
    State(state): State<Arc<GatewayState<A, D>>>,
    user: ManagementUser,
    DevicePath(device_id): DevicePath,
    ValidJson(update): ValidJson<TwinUpdate>,
) -> Result<StatusCode, ApiError>
where
    A: App + 'static,
    D: IdentityDecoder + 'static,
{
    state
        .app
        .set_device_twin(&user.tenant, &device_id, update)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Merge tags and desired properties into a device twin.
///
/// # Errors
///
/// Returns `400` if the device id or body is malformed, or an error if the
/// backend operation fails.
pub async fn update_device_twin<A, D>(
    State(state): State<Arc<GatewayState<A, D>>>,
    user: ManagementUser,
    DevicePath(device_id): DevicePath,
    ValidJson(update): ValidJson<TwinUpdate>,
) -> Result<StatusCode, ApiError>
where
    A: App + 'static,
    D: IdentityDecoder + 'static,
{
    state
        .app
        .update_device_twin(&user.tenant, &device_id, update)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List a device's modules.
///
/// # Errors
///
/// Returns an error if the device id is malformed or the backend operation fails.
pub async fn get_device_modules<A, D>(
    State(state): State<Arc<GatewayState<A, D>>>,
    user: ManagementUser,
    DevicePath(device_id): DevicePath,
) -> Result<Json<Vec<Module>>, ApiError>
where
    A: App + 'static,
    D: IdentityDecoder + 'static,
{
    let modules = state
        .app
        .get_device_modules(&user.tenant, &device_id)
        .await?;
    Ok(Json(modules))
}
