//! Settings storage layer for iot-manager.
//!
//! This crate persists the per-tenant [`Settings`] document. Two
//! implementations of the [`Store`] trait are provided:
//!
//! - [`RocksStore`]: `RocksDB` with one column family per record kind
//! - [`MemoryStore`]: a process-local map, used in tests and development
//!
//! # Architecture
//!
//! The `RocksDB` layout uses the following column families:
//!
//! - `settings`: Settings records, keyed by `tenant_id`
//!
//! # Example
//!
//! ```no_run
//! use iot_manager_core::{Settings, TenantId};
//! use iot_manager_store::{RocksStore, Store};
//!
//! let store = RocksStore::open("/tmp/iot-manager-db").unwrap();
//!
//! let tenant = TenantId::new("123456789012345678901234");
//! store.put_settings(&tenant, &Settings::new("HostName=hub.example.net")).unwrap();
//! let settings = store.get_settings(&tenant).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod memory;
pub mod rocks;
pub mod schema;
pub mod types;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use rocks::RocksStore;
pub use types::SettingsRecord;

use iot_manager_core::{Settings, TenantId};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different implementations
/// (e.g., `RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    /// Get the settings record of a tenant.
    ///
    /// Returns `None` when the tenant never stored settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_settings(&self, tenant: &TenantId) -> Result<Option<SettingsRecord>>;

    /// Insert or replace the settings of a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_settings(&self, tenant: &TenantId, settings: &Settings) -> Result<()>;

    /// Check that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot serve requests.
    fn ping(&self) -> Result<()>;
}
