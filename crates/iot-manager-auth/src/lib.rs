//! Identity extraction for iot-manager.
//!
//! This crate turns the bearer token of a management request into a typed
//! [`Identity`] and holds the authorization policy applied to it:
//!
//! - Claims decoding of JWTs whose signature was verified upstream
//! - The user-only policy for management operations
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐
//! │   Gateway        │────▶│ IdentityDecoder  │
//! │   (middleware)   │     │   (trait)        │
//! └──────────────────┘     └────────┬─────────┘
//!                                   │
//!                          ┌────────▼─────────┐
//!                          │JwtIdentityDecoder│
//!                          │  (claims only)   │
//!                          └────────┬─────────┘
//!                                   │
//!                          ┌────────▼─────────┐
//!                          │    Identity      │
//!                          │ tenant, subject, │
//!                          │ user / device    │
//!                          └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use iot_manager_auth::{IdentityDecoder, JwtIdentityDecoder};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let decoder = JwtIdentityDecoder::new();
//!
//! // In a request handler:
//! let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...";
//! let identity = decoder.decode(token)?;
//! identity.require_user()?;
//!
//! println!("Tenant: {}", identity.tenant);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod identity;
pub mod jwt;

pub use error::{AuthError, Result};
pub use identity::Identity;
pub use jwt::{IdentityDecoder, JwtIdentityDecoder};

#[cfg(any(test, feature = "test-utils"))]
pub use jwt::encode_test_token;
