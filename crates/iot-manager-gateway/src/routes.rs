//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::Request;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

use iot_manager_app::App;
use iot_manager_auth::IdentityDecoder;

use crate::auth;
use crate::error::correlate_errors;
use crate::handlers::{self, devices, internal, settings};
use crate::state::GatewayState;

/// Base path of the unauthenticated internal API.
pub const INTERNAL_API: &str = "/api/internal/v1/iot-manager";

/// Base path of the management API.
pub const MANAGEMENT_API: &str = "/api/management/v1/iot-manager";

/// Correlation id header.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Create the gateway router with all routes and middleware.
///
/// # Routes
///
/// ## Internal (`/api/internal/v1/iot-manager`)
/// - `GET /alive` - Liveness probe
/// - `GET /health` - Readiness probe
///
/// ## Management (`/api/management/v1/iot-manager`, user identity required)
/// - `GET /settings` - Get tenant settings
/// - `PUT /settings` - Replace tenant settings
/// - `GET /device/{id}` - Get device
/// - `GET /device/{id}/twin` - Get device twin
/// - `PUT /device/{id}/twin` - Replace device twin
/// - `PATCH /device/{id}/twin` - Merge device twin
/// - `GET /device/{id}/modules` - List device modules
///
/// Unmatched paths and methods get a `404` error envelope.
pub fn create_router<A, D>(state: GatewayState<A, D>) -> Router
where
    A: App + 'static,
    D: IdentityDecoder + 'static,
{
    // Extract config values before moving state
    let max_body_bytes = state.config.max_body_bytes;

    let state = Arc::new(state);

    let internal = Router::new()
        .route("/alive", get(internal::alive).fallback(handlers::no_route))
        .route(
            "/health",
            get(internal::health::<A, D>).fallback(handlers::no_route),
        );

    let management = Router::new()
        .route(
            "/settings",
            get(settings::get_settings::<A, D>)
                .put(settings::set_settings::<A, D>)
                .fallback(handlers::no_route),
        )
        .route(
            "/device/{id}",
            get(devices::get_device::<A, D>).fallback(handlers::no_route),
        )
        .route(
            "/device/{id}/twin",
            get(devices::get_device_twin::<A, D>)
                .put(devices::set_device_twin::<A, D>)
                .patch(devices::update_device_twin::<A, D>)
                .fallback(handlers::no_route),
        )
        .route(
            "/device/{id}/modules",
            get(devices::get_device_modules::<A, D>).fallback(handlers::no_route),
        )
        .route_layer(from_fn_with_state(
            Arc::clone(&state),
            auth::require_identity::<A, D>,
        ));

    Router::new()
        .nest(INTERNAL_API, internal)
        .nest(MANAGEMENT_API, management)
        .fallback(handlers::no_route)
        // Middleware
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(from_fn(correlate_errors)),
        )
        .with_state(state)
}

/// Access log span of a request.
fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}
