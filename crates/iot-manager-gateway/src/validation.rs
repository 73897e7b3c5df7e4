//! Request binding and validation extractors.

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use iot_manager_core::{DeviceId, Validate};

use crate::error::ApiError;

/// JSON body extractor that validates the decoded payload.
///
/// The body is decoded regardless of its `Content-Type`. Decoding and
/// validation failures are both rejected with `400`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        let value = decode::<T>(&bytes)?;
        Ok(Self(value))
    }
}

/// Decode and validate a JSON payload.
///
/// # Errors
///
/// Returns `ApiError::MalformedBody` if the bytes are not valid JSON for `T`
/// or the decoded value fails validation.
pub fn decode<T>(bytes: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned + Validate,
{
    let value: T =
        serde_json::from_slice(bytes).map_err(|e| ApiError::MalformedBody(e.to_string()))?;
    value
        .validate()
        .map_err(|e| ApiError::MalformedBody(e.to_string()))?;
    Ok(value)
}

/// Device id path parameter.
#[derive(Debug, Clone)]
pub struct DevicePath(pub DeviceId);

impl<S> FromRequestParts<S> for DevicePath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::MalformedDeviceId(e.body_text()))?;

        DeviceId::parse(&raw)
            .map(Self)
            .map_err(|e| ApiError::MalformedDeviceId(e.to_string()))
    }
}
