//! Tenant settings endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use iot_manager_app::App;
use iot_manager_auth::IdentityDecoder;
use iot_manager_core::Settings;

use crate::auth::ManagementUser;
use crate::error::ApiError;
use crate::state::GatewayState;
use crate::validation::ValidJson;

/// Get the settings of the caller's tenant.
///
/// A tenant without stored settings gets `{}`.
///
/// # Errors
///
/// Returns an error if the backend operation fails.
pub async fn get_settings<A, D>(
    State(state): State<Arc<GatewayState<A, D>>>,
    user: ManagementUser,
) -> Result<Json<Settings>, ApiError>
where
    A: App + 'static,
    D: IdentityDecoder + 'static,
{
    let settings = state.app.get_settings(&user.tenant).await?;
    Ok(Json(settings))
}

/// Replace the settings of the caller's tenant.
///
/// # Errors
///
/// Returns `400` if the body is malformed or invalid, in which case the
/// backend is not called, or an error if the backend operation fails.
pub async fn set_settings<A, D>(
    State(state): State<Arc<GatewayState<A, D>>>,
    user: ManagementUser,
    ValidJson(settings): ValidJson<Settings>,
) -> Result<StatusCode, ApiError>
where
    A: App + 'static,
    D: IdentityDecoder + 'static,
{
    state.app.set_settings(&user.tenant, settings).await?;
    Ok(StatusCode::NO_CONTENT)
}
