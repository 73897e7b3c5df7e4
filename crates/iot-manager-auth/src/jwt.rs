//! Identity token decoding.
//!
//! Tokens reach the gateway after their signature was verified by the
//! infrastructure in front of it. Decoding here only parses the JWT header
//! and claims into an [`Identity`].

use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::error::{AuthError, Result};
use crate::identity::Identity;

/// Trait for turning a bearer token into an identity.
pub trait IdentityDecoder: Send + Sync {
    /// Decode a token into the caller's identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is malformed or lacks required claims.
    fn decode(&self, token: &str) -> Result<Identity>;
}

/// Decodes the claims of a JWT without verifying its signature.
#[derive(Clone)]
pub struct JwtIdentityDecoder {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityDecoder {
    /// Create a decoder that trusts the signature check done upstream.
    #[must_use]
    pub fn new() -> Self {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            key: DecodingKey::from_secret(&[]),
            validation,
        }
    }
}

impl Default for JwtIdentityDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for JwtIdentityDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIdentityDecoder").finish_non_exhaustive()
    }
}

impl IdentityDecoder for JwtIdentityDecoder {
    fn decode(&self, token: &str) -> Result<Identity> {
        let data = decode::<Identity>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Failed to decode identity token");
            AuthError::InvalidToken(e.to_string())
        })?;

        let identity = data.claims;
        if identity.subject.is_empty() {
            return Err(AuthError::MissingClaim("sub"));
        }

        Ok(identity)
    }
}

/// Encode an identity as an HS256-signed JWT for tests.
///
/// # Panics
///
/// Panics if the claims cannot be serialized.
#[cfg(any(test, feature = "test-utils"))]
#[must_use]
pub fn encode_test_token(identity: &Identity) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    encode(
        &Header::default(),
        identity,
        &EncodingKey::from_secret(b"hmac-sha256-secret"),
    )
    .expect("identity claims serialize")
}
