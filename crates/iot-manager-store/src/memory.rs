//! In-memory storage implementation.

use std::collections::HashMap;

use iot_manager_core::{Settings, TenantId};
use parking_lot::RwLock;

use crate::error::Result;
use crate::types::SettingsRecord;
use crate::Store;

/// A `Store` kept entirely in process memory.
///
/// Contents are lost when the value is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    settings: RwLock<HashMap<TenantId, SettingsRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get_settings(&self, tenant: &TenantId) -> Result<Option<SettingsRecord>> {
        Ok(self.settings.read().get(tenant).cloned())
    }

    fn put_settings(&self, tenant: &TenantId, settings: &Settings) -> Result<()> {
        let record = SettingsRecord::new(tenant.clone(), settings.clone());
        self.settings.write().insert(tenant.clone(), record);
        Ok(())
    }

    fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip() {
        let store = MemoryStore::new();
        let tenant = TenantId::new("t1");

        assert!(store.get_settings(&tenant).unwrap().is_none());
        store.put_settings(&tenant, &Settings::new("a://b")).unwrap();

        let record = store.get_settings(&tenant).unwrap().unwrap();
        assert_eq!(record.settings, Settings::new("a://b"));
        assert!(store.get_settings(&TenantId::new("t2")).unwrap().is_none());
        assert!(store.ping().is_ok());
    }
}
