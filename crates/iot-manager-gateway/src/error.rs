//! API error types and responses.
//!
//! Every error response carries the same envelope:
//!
//! ```text
//! { "error": "<message>", "request_id": "<correlation id>" }
//! ```
//!
//! [`ApiError`] renders the status code and envelope; the
//! [`correlate_errors`] middleware fills in `request_id` from the request's
//! correlation id, so errors raised by extractors, route layers and the
//! fallback all carry it.

use axum::extract::rejection::BytesRejection;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::request_id::RequestId;

use iot_manager_app::AppError;
use iot_manager_auth::AuthError;

/// API error type that implements `IntoResponse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No bearer token was supplied.
    #[error("missing authorization header")]
    MissingAuthorization,

    /// The bearer token does not decode into an identity.
    #[error("invalid authorization token")]
    InvalidToken,

    /// The caller is not a user.
    #[error("missing user authentication")]
    Forbidden,

    /// The request body cannot be decoded or fails validation.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// The device id path parameter is invalid.
    #[error("malformed device id: {0}")]
    MalformedDeviceId(String),

    /// The request body exceeds the configured limit.
    #[error("request body too large")]
    PayloadTooLarge,

    /// A backend operation failed.
    #[error("{0}")]
    Backend(String),

    /// A dependency is unhealthy.
    #[error("{0}")]
    Unavailable(String),

    /// No route matches the request.
    #[error("not found")]
    NotFound,
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Error message.
    pub error: String,
    /// Correlation id of the failed request.
    pub request_id: String,
}

/// Message of an error response, attached as a response extension until the
/// correlation id is known.
#[derive(Debug, Clone)]
struct ErrorMessage(String);

impl ApiError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingAuthorization | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::MalformedBody(_) | Self::MalformedDeviceId(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        let body = ErrorEnvelope {
            error: message.clone(),
            request_id: String::new(),
        };

        (status, Extension(ErrorMessage(message)), Json(body)).into_response()
    }
}

/// Middleware that stamps the request's correlation id into error envelopes.
///
/// Must run inside the layer that assigns the `RequestId`.
pub async fn correlate_errors(request: Request, next: Next) -> Response {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or_default()
        .to_string();

    let mut response = next.run(request).await;
    let Some(ErrorMessage(message)) = response.extensions_mut().remove::<ErrorMessage>() else {
        return response;
    };

    let status = response.status();
    if status.is_server_error() {
        tracing::error!(status = %status, error = %message, request_id = %request_id, "Request failed");
    } else {
        tracing::debug!(status = %status, error = %message, request_id = %request_id, "Request rejected");
    }

    let (parts, _) = response.into_parts();
    let body = Json(ErrorEnvelope {
        error: message,
        request_id,
    })
    .into_response()
    .into_body();

    Response::from_parts(parts, body)
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingAuthorization => Self::MissingAuthorization,
            AuthError::InvalidToken(_) | AuthError::MissingClaim(_) => {
                tracing::debug!(error = %err, "Rejected identity token");
                Self::InvalidToken
            }
            AuthError::MissingUserAuthentication => Self::Forbidden,
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Store(store_err) => {
                tracing::error!(error = %store_err, "Store error");
                Self::Backend("storage error".to_string())
            }
            AppError::NoConnectionString | AppError::Backend(_) | AppError::Internal(_) => {
                Self::Backend(err.to_string())
            }
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge
        } else {
            Self::MalformedBody(rejection.body_text())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iot_manager_store::StoreError;

    #[test]
    fn error_status_codes() {
        assert_eq!(
            ApiError::MissingAuthorization.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::MalformedBody("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::MalformedDeviceId("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Backend("test".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Unavailable("test".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn auth_errors_map_to_fixed_messages() {
        let err = ApiError::from(AuthError::InvalidToken("InvalidSegment".into()));
        assert_eq!(err.to_string(), "invalid authorization token");

        let err = ApiError::from(AuthError::MissingUserAuthentication);
        assert_eq!(err.to_string(), "missing user authentication");
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn app_errors_keep_their_message() {
        let err = ApiError::from(AppError::Backend("device not found".into()));
        assert_eq!(err.to_string(), "device twin backend error: device not found");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn store_details_are_hidden() {
        let err = ApiError::from(AppError::Store(StoreError::Database(
            "IO error: /var/lib/iot-manager/LOCK".into(),
        )));
        assert_eq!(err.to_string(), "storage error");
    }

    #[test]
    fn response_carries_message_extension() {
        let response = ApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<ErrorMessage>().is_some());
    }
}
