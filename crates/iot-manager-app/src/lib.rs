//! Service layer for iot-manager.
//!
//! This crate defines the [`App`] interface the HTTP gateway calls for every
//! management operation, and [`ManagerService`], the implementation used by
//! the gateway binary.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Gateway (HTTP)                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │  App trait
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ManagerService                         │
//! │  ┌─────────────────────┐   ┌─────────────────────────────┐  │
//! │  │  Tenant settings    │   │  Device / twin / modules    │  │
//! │  └─────────────────────┘   └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//!                │                              │
//!                ▼                              ▼
//!         ┌────────────┐               ┌─────────────────┐
//!         │   Store    │               │  TwinBackend    │
//!         │ (RocksDB)  │               │  (HTTP service) │
//!         └────────────┘               └─────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use iot_manager_app::{App, HttpTwinBackend, ManagerService, TwinBackendConfig};
//! use iot_manager_core::TenantId;
//! use iot_manager_store::RocksStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(RocksStore::open("/tmp/iot-manager")?);
//! let backend = Arc::new(HttpTwinBackend::new(TwinBackendConfig::new(
//!     "http://twin-service:8080",
//! ))?);
//! let app = ManagerService::new(store, backend);
//!
//! let settings = app.get_settings(&TenantId::new("tenant-a")).await?;
//! println!("configured: {}", !settings.is_empty());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod service;
pub mod twin_client;
pub mod types;

pub use error::{AppError, Result};
pub use service::{App, ManagerService};
pub use twin_client::{HttpTwinBackend, TwinBackend, UnconfiguredTwinBackend};
pub use types::{TwinBackendConfig, TwinScope};

// Re-export commonly used types from dependencies for convenience
pub use iot_manager_core::{Device, DeviceId, DeviceTwin, Module, Settings, TenantId, TwinUpdate};
