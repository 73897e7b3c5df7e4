//! Device, module and device twin payloads.
//!
//! These types follow the managed-device platform's camelCase JSON format.
//! Property bags are kept as raw JSON maps; the gateway never interprets
//! their contents beyond the structural limits enforced by [`TwinUpdate`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::validate::Validate;

/// A JSON object holding twin tags or properties.
pub type PropertyMap = serde_json::Map<String, Value>;

/// Maximum nesting depth of tags and desired properties.
pub const MAX_TWIN_DEPTH: usize = 10;

/// Maximum length of a twin property key, in bytes.
const MAX_KEY_BYTES: usize = 1024;

/// The device twin document of a single device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTwin {
    /// Device the twin belongs to.
    pub device_id: String,
    /// Module id, set for module twins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_id: Option<String>,
    /// Entity tag for optimistic concurrency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    /// Twin version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    /// Device status (e.g. `enabled`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Back-end owned tags.
    #[serde(default)]
    pub tags: PropertyMap,
    /// Desired and reported properties.
    #[serde(default)]
    pub properties: TwinProperties,
}

/// The desired and reported property sections of a twin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TwinProperties {
    /// Properties set by the back end.
    #[serde(default)]
    pub desired: PropertyMap,
    /// Properties reported by the device.
    #[serde(default)]
    pub reported: PropertyMap,
}

/// Request body for replacing or patching a device twin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TwinUpdate {
    /// Tags to set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<PropertyMap>,
    /// Desired properties to set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<DesiredProperties>,
    /// Expected twin etag; the update only applies when it matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

/// The desired section of a twin update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesiredProperties {
    /// Desired properties.
    #[serde(default)]
    pub desired: PropertyMap,
}

impl Validate for TwinUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(tags) = &self.tags {
            validate_map("tags", tags, 1)?;
        }
        if let Some(properties) = &self.properties {
            validate_map("properties.desired", &properties.desired, 1)?;
        }
        Ok(())
    }
}

fn validate_map(path: &str, map: &PropertyMap, depth: usize) -> Result<(), ValidationError> {
    if depth > MAX_TWIN_DEPTH {
        return Err(ValidationError::field(
            path,
            format!("nesting depth must not exceed {MAX_TWIN_DEPTH}"),
        ));
    }
    for (key, value) in map {
        validate_key(path, key)?;
        if let Value::Object(child) = value {
            validate_map(&format!("{path}.{key}"), child, depth + 1)?;
        }
    }
    Ok(())
}

fn validate_key(path: &str, key: &str) -> Result<(), ValidationError> {
    if key.is_empty() {
        return Err(ValidationError::field(path, "keys must not be empty"));
    }
    if key.len() > MAX_KEY_BYTES {
        return Err(ValidationError::field(
            path,
            format!("key length must not exceed {MAX_KEY_BYTES} bytes"),
        ));
    }
    if let Some(c) = key
        .chars()
        .find(|c| matches!(c, '.' | '$' | ' ') || c.is_control())
    {
        return Err(ValidationError::field(
            path,
            format!("key {key:?} contains forbidden character {c:?}"),
        ));
    }
    Ok(())
}

/// A device registered with the managed-device platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Device id.
    pub device_id: String,
    /// Generation id, changes when a device is recreated with the same id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_id: Option<String>,
    /// Entity tag of the device identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    /// Device status (`enabled` / `disabled`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Reason for the current status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,
    /// Connection state (`Connected` / `Disconnected`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_state: Option<String>,
    /// Timestamp of the device's last activity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity_time: Option<String>,
}

/// A module running on a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// Module id.
    pub module_id: String,
    /// Device hosting the module.
    pub device_id: String,
    /// Generation id of the module identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_id: Option<String>,
    /// Connection state (`Connected` / `Disconnected`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_state: Option<String>,
    /// Timestamp of the module's last activity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn update(value: Value) -> TwinUpdate {
        serde_json::from_value(value).unwrap()
    }

    fn nested(depth: usize) -> Value {
        (0..depth).fold(json!(1), |inner, i| json!({ format!("k{i}"): inner }))
    }

    #[test]
    fn twin_wire_format() {
        let twin: DeviceTwin = serde_json::from_value(json!({
            "deviceId": "dev-1",
            "etag": "AAAAAAAAAAE=",
            "version": 4,
            "tags": {"site": "oslo"},
            "properties": {
                "desired": {"interval": 30},
                "reported": {"interval": 60}
            }
        }))
        .unwrap();

        assert_eq!(twin.device_id, "dev-1");
        assert_eq!(twin.version, Some(4));
        assert_eq!(twin.tags["site"], "oslo");
        assert_eq!(twin.properties.reported["interval"], 60);

        let out = serde_json::to_value(&twin).unwrap();
        assert!(out.get("moduleId").is_none());
        assert_eq!(out["properties"]["desired"]["interval"], 30);
    }

    #[test]
    fn update_accepts_valid_document() {
        let update = update(json!({
            "tags": {"site": {"city": "oslo"}},
            "properties": {"desired": {"fw": {"version": "1.2.3"}}}
        }));
        assert!(update.validate().is_ok());
        assert!(TwinUpdate::default().validate().is_ok());
    }

    #[test]
    fn update_depth_limit() {
        let ok = update(json!({ "tags": nested(MAX_TWIN_DEPTH) }));
        assert!(ok.validate().is_ok());

        let too_deep = update(json!({
            "properties": {"desired": nested(MAX_TWIN_DEPTH + 1)}
        }));
        let err = too_deep.validate().unwrap_err();
        assert!(err.to_string().contains("nesting depth"));
    }

    #[test]
    fn update_rejects_forbidden_keys() {
        for key in ["a.b", "$meta", "with space", ""] {
            let update = update(json!({ "tags": { key: 1 } }));
            assert!(update.validate().is_err(), "key {key:?} should be rejected");
        }
    }

    #[test]
    fn module_wire_format() {
        let modules: Vec<Module> = serde_json::from_value(json!([
            {"moduleId": "$edgeAgent", "deviceId": "dev-1", "connectionState": "Connected"}
        ]))
        .unwrap();
        assert_eq!(modules[0].module_id, "$edgeAgent");
        assert_eq!(modules[0].connection_state.as_deref(), Some("Connected"));
    }
}
