//! Error types for the service layer.
//!
//! These are the only errors the gateway sees from a backend call; it maps
//! them by variant and never inspects their sources.

use thiserror::Error;

/// A result type using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Errors that can occur in service operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// The tenant has no connection string, so its devices cannot be reached.
    #[error("connection string not configured for tenant")]
    NoConnectionString,

    /// Storage layer error.
    #[error("storage error: {0}")]
    Store(#[from] iot_manager_store::StoreError),

    /// The device twin service failed or rejected the request.
    #[error("device twin backend error: {0}")]
    Backend(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            AppError::NoConnectionString.to_string(),
            "connection string not configured for tenant"
        );
        assert_eq!(
            AppError::Backend("timeout".into()).to_string(),
            "device twin backend error: timeout"
        );
    }
}
