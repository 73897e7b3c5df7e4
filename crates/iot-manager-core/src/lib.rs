//! Core types and utilities for iot-manager.
//!
//! This crate provides the foundational types used throughout the iot-manager gateway:
//!
//! - **Identifiers**: Strongly-typed tenant and device identifiers
//! - **Validation**: The [`Validate`] capability implemented by request payloads
//! - **Payloads**: Tenant [`Settings`] and the device twin wire types
//!
//! # Example
//!
//! ```
//! use iot_manager_core::{DeviceId, Settings, Validate};
//!
//! let device_id = DeviceId::parse("sensor-0042").unwrap();
//! assert_eq!(device_id.as_str(), "sensor-0042");
//!
//! let settings = Settings::new("HostName=hub.example.net;SharedAccessKey=abc");
//! assert!(settings.validate().is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod ids;
pub mod settings;
pub mod twin;
pub mod validate;

pub use error::{IdError, ValidationError};
pub use ids::{DeviceId, TenantId};
pub use settings::{Settings, MAX_CONNECTION_STRING_LEN};
pub use twin::{
    DesiredProperties, Device, DeviceTwin, Module, PropertyMap, TwinProperties, TwinUpdate,
    MAX_TWIN_DEPTH,
};
pub use validate::Validate;
