//! Records stored in the database.

use chrono::{DateTime, Utc};
use iot_manager_core::{Settings, TenantId};
use serde::{Deserialize, Serialize};

/// A tenant's settings as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRecord {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// The settings document.
    pub settings: Settings,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl SettingsRecord {
    /// Create a record stamped with the current time.
    #[must_use]
    pub fn new(tenant_id: TenantId, settings: Settings) -> Self {
        Self {
            tenant_id,
            settings,
            updated_at: Utc::now(),
        }
    }
}
