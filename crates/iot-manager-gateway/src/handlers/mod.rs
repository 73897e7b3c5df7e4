//! HTTP request handlers.
//!
//! This module contains all the endpoint handlers for the gateway API.

pub mod devices;
pub mod internal;
pub mod settings;

use crate::error::ApiError;

/// Fallback for unmatched paths and methods.
pub async fn no_route() -> ApiError {
    ApiError::NotFound
}
