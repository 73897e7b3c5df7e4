//! Payload validation capability.
//!
//! Every request payload bound by the gateway implements [`Validate`]. The
//! default implementation accepts any value that decoded successfully, which
//! is the structural check performed by serde. Payloads with field rules
//! override [`Validate::validate`], and that override is what the gateway
//! calls.

use crate::error::ValidationError;

/// A payload that can check its own field-level rules.
pub trait Validate {
    /// Validate the payload.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing the first violated rule.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), ValidationError> {
        self.iter().try_for_each(Validate::validate)
    }
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self) -> Result<(), ValidationError> {
        self.as_ref().map_or(Ok(()), Validate::validate)
    }
}
