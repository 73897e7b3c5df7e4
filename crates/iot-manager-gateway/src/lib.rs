//! Management HTTP gateway for iot-manager.
//!
//! This crate provides the HTTP API through which tenant users manage their
//! device hub settings and the twins of their devices. It handles:
//!
//! - Identity extraction from bearer tokens and the user-only policy
//! - Request body binding and validation
//! - A uniform `{error, request_id}` envelope on every error response
//! - Request correlation through the `x-request-id` header
//! - Graceful shutdown
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Clients                             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   iot-manager-gateway                       │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐    │
//! │  │  Identity   │ │  Validator  │ │   Router            │    │
//! │  │  Middleware │ │  (ValidJson)│ │   + Handlers        │    │
//! │  └─────────────┘ └─────────────┘ └─────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │  App trait
//!                              ▼
//!                   ┌────────────────────┐
//!                   │   ManagerService   │
//!                   └────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use iot_manager_app::{ManagerService, UnconfiguredTwinBackend};
//! use iot_manager_auth::JwtIdentityDecoder;
//! use iot_manager_gateway::{create_router, server, GatewayConfig, GatewayState};
//! use iot_manager_store::RocksStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Initialize dependencies
//! let store = Arc::new(RocksStore::open("/tmp/iot-manager")?);
//! let app = Arc::new(ManagerService::new(store, Arc::new(UnconfiguredTwinBackend::new())));
//! let decoder = Arc::new(JwtIdentityDecoder::new());
//!
//! // Create gateway state
//! let config = GatewayConfig::default();
//! let grace = config.shutdown_grace();
//! let state = GatewayState::new(app, decoder, config);
//!
//! // Create router
//! let router = create_router(state);
//!
//! // Run server
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! server::serve(listener, router, server::shutdown_signal(), grace).await;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;
pub mod validation;

pub use config::{ConfigError, GatewayConfig};
pub use error::{ApiError, ErrorEnvelope};
pub use routes::create_router;
pub use state::GatewayState;

// Re-export key types for convenience
pub use auth::ManagementUser;
pub use validation::ValidJson;
