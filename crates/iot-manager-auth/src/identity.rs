//! The decoded identity of a caller.

use iot_manager_core::TenantId;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};

/// Claims of an identity token.
///
/// Tenant and role flags use the `mender.` claim namespace; the bare names are
/// accepted on input as well.
///
/// The token issuer does not guarantee that `is_user` and `is_device` are
/// mutually exclusive, so authorization only ever looks at `is_user`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Subject (user or device id).
    #[serde(rename = "sub", default)]
    pub subject: String,
    /// Tenant the subject belongs to.
    #[serde(
        rename = "mender.tenant",
        alias = "tenant",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub tenant: String,
    /// Whether the token was issued to a user.
    #[serde(
        rename = "mender.user",
        alias = "user",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub is_user: bool,
    /// Whether the token was issued to a device.
    #[serde(
        rename = "mender.device",
        alias = "device",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub is_device: bool,
}

impl Identity {
    /// Identity of a user within a tenant.
    #[must_use]
    pub fn user(tenant: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            tenant: tenant.into(),
            is_user: true,
            is_device: false,
        }
    }

    /// Identity of a device within a tenant.
    #[must_use]
    pub fn device(tenant: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            tenant: tenant.into(),
            is_user: false,
            is_device: true,
        }
    }

    /// The tenant scope of every operation performed by this identity.
    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        TenantId::new(self.tenant.clone())
    }

    /// Enforce the management policy: only users may manage settings and devices.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingUserAuthentication` unless `is_user` is set.
    pub fn require_user(&self) -> Result<()> {
        if self.is_user {
            Ok(())
        } else {
            Err(AuthError::MissingUserAuthentication)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn users_pass_policy() {
        assert!(Identity::user("t1", "u1").require_user().is_ok());
    }

    #[test]
    fn devices_fail_policy() {
        let err = Identity::device("t1", "d1").require_user().unwrap_err();
        assert!(matches!(err, AuthError::MissingUserAuthentication));
    }

    #[test]
    fn policy_checks_user_flag_explicitly() {
        let neither = Identity {
            subject: "s".into(),
            ..Identity::default()
        };
        assert!(neither.require_user().is_err());

        let both = Identity {
            is_device: true,
            ..Identity::user("t1", "s")
        };
        assert!(both.require_user().is_ok());
    }

    #[test]
    fn claim_names() {
        let identity = Identity::user("tenant-a", "user-1");
        let claims = serde_json::to_value(&identity).unwrap();
        assert_eq!(claims["sub"], "user-1");
        assert_eq!(claims["mender.tenant"], "tenant-a");
        assert_eq!(claims["mender.user"], true);
        assert!(claims.get("mender.device").is_none());
        assert_eq!(identity.tenant_id().as_str(), "tenant-a");
    }

    #[test]
    fn accepts_bare_claim_names() {
        let identity: Identity = serde_json::from_value(serde_json::json!({
            "sub": "d1",
            "tenant": "tenant-b",
            "device": true
        }))
        .unwrap();
        assert_eq!(identity, Identity::device("tenant-b", "d1"));
    }
}
