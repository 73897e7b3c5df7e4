//! Internal API endpoints.
//!
//! These endpoints are used by the orchestrator's liveness and readiness
//! probes. They don't require authentication.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;

use iot_manager_app::App;
use iot_manager_auth::IdentityDecoder;

use crate::error::ApiError;
use crate::state::GatewayState;

/// Liveness probe.
///
/// ```text
/// GET /api/internal/v1/iot-manager/alive
///
/// Response: 204 No Content
/// ```
pub async fn alive() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Readiness probe.
///
/// Runs the backend health check under the configured timeout; the check is
/// dropped when the timeout expires.
///
/// # Errors
///
/// Returns `503` with the failure message if the health check fails or
/// does not finish in time.
pub async fn health<A, D>(
    State(state): State<Arc<GatewayState<A, D>>>,
) -> Result<StatusCode, ApiError>
where
    A: App + 'static,
    D: IdentityDecoder + 'static,
{
    let timeout = state.config.health_timeout();

    match tokio::time::timeout(timeout, state.app.health_check()).await {
        Ok(Ok(())) => Ok(StatusCode::NO_CONTENT),
        Ok(Err(err)) => {
            tracing::error!(error = %err, "Health check failed");
            Err(ApiError::Unavailable(err.to_string()))
        }
        Err(_) => {
            tracing::error!(
                timeout_seconds = timeout.as_secs(),
                "Health check timed out"
            );
            Err(ApiError::Unavailable("health check timed out".to_string()))
        }
    }
}
