//! Authentication error types.

use thiserror::Error;

/// A result type using `AuthError`.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur while extracting or authorizing an identity.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The request carries no usable `Authorization` header.
    #[error("missing authorization header")]
    MissingAuthorization,

    /// The token could not be decoded into an identity.
    #[error("invalid authorization token: {0}")]
    InvalidToken(String),

    /// A required claim is missing from the token.
    #[error("missing required claim: {0}")]
    MissingClaim(&'static str),

    /// The identity does not belong to a user.
    #[error("missing user authentication")]
    MissingUserAuthentication,
}
