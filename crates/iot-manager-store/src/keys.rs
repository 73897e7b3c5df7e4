//! Key encoding utilities for `RocksDB`.
//!
//! Keys carry a short record-kind prefix so that the default (empty) tenant
//! still maps to a non-empty key.

use iot_manager_core::TenantId;

const TENANT_PREFIX: &[u8] = b"tenant:";

/// Encode a settings key: `"tenant:" || tenant_id`.
#[must_use]
pub fn settings_key(tenant: &TenantId) -> Vec<u8> {
    let mut key = Vec::with_capacity(TENANT_PREFIX.len() + tenant.as_str().len());
    key.extend_from_slice(TENANT_PREFIX);
    key.extend_from_slice(tenant.as_str().as_bytes());
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tenant_key_is_not_empty() {
        assert_eq!(settings_key(&TenantId::default()), b"tenant:".to_vec());
    }

    #[test]
    fn tenant_keys_are_distinct() {
        let a = settings_key(&TenantId::new("a"));
        let b = settings_key(&TenantId::new("b"));
        assert_ne!(a, b);
        assert_eq!(a, b"tenant:a".to_vec());
    }
}
