//! Mutation request types for the grant store.

use chrono::{DateTime, Utc};
use lumen_core::{AdminRole, AdminRoleGrant, IpRule, LumenResult, PermissionSet, UserId};
use serde::{Deserialize, Serialize};

/// Request to create a new admin role grant.
///
/// Allow-list entries arrive as raw strings and are validated before
/// anything is persisted; a bad entry fails the whole request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGrant {
    /// The user receiving the grant.
    pub user_id: UserId,

    /// The role tier to assign.
    pub role: AdminRole,

    /// Explicit permission overrides; inherited keys are forced on top.
    #[serde(default)]
    pub permissions: PermissionSet,

    /// The super admin performing the action.
    pub granted_by: UserId,

    /// Optional expiry timestamp.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,

    /// Whether the grant starts active. Defaults to `true`.
    #[serde(default = "default_active")]
    pub active: bool,

    /// Allow-list entries: literal addresses or CIDR blocks.
    #[serde(default)]
    pub allowed_ips: Vec<String>,
}

const fn default_active() -> bool {
    true
}

impl CreateGrant {
    /// Creates a request with defaults: no expiry, active, unrestricted.
    #[must_use]
    pub fn new(user_id: UserId, role: AdminRole, granted_by: UserId) -> Self {
        Self {
            user_id,
            role,
            permissions: PermissionSet::new(),
            granted_by,
            expires_at: None,
            active: true,
            allowed_ips: Vec::new(),
        }
    }

    /// Sets explicit permission overrides.
    #[must_use]
    pub fn with_permissions(mut self, permissions: PermissionSet) -> Self {
        self.permissions = permissions;
        self
    }

    /// Sets an expiry timestamp.
    #[must_use]
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Sets the network allow-list.
    #[must_use]
    pub fn with_allowed_ips<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_ips = entries.into_iter().map(Into::into).collect();
        self
    }

    /// Validates the request and builds the grant entity, forcing inherited
    /// permissions into the stored set.
    pub fn into_grant(self) -> LumenResult<AdminRoleGrant> {
        let allowed_ips = IpRule::parse_list(&self.allowed_ips)?;

        let mut grant =
            AdminRoleGrant::new(self.user_id, self.role, self.permissions, self.granted_by);
        grant.expires_at = self.expires_at;
        grant.active = self.active;
        grant.allowed_ips = allowed_ips;
        Ok(grant)
    }
}

/// Partial update for an existing grant.
///
/// Only supplied fields change; omitted fields keep their prior values.
/// `expires_at` uses a nested option so "leave alone" (`None`) and "clear
/// the expiry" (`Some(None)`) stay distinguishable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrantUpdate {
    /// New role tier; triggers forced inheritance on change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<AdminRole>,

    /// Replacement permission overrides; inherited keys are re-forced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<PermissionSet>,

    /// New expiry, or `Some(None)` to clear it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Option<DateTime<Utc>>>,

    /// Suspend (`false`) or reactivate (`true`) the grant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    /// Replacement allow-list entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_ips: Option<Vec<String>>,
}

impl GrantUpdate {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes the role tier.
    #[must_use]
    pub fn role(mut self, role: AdminRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Replaces the explicit permission overrides.
    #[must_use]
    pub fn permissions(mut self, permissions: PermissionSet) -> Self {
        self.permissions = Some(permissions);
        self
    }

    /// Sets a new expiry timestamp.
    #[must_use]
    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(Some(expires_at));
        self
    }

    /// Clears the expiry, making the grant permanent.
    #[must_use]
    pub fn clear_expiry(mut self) -> Self {
        self.expires_at = Some(None);
        self
    }

    /// Suspends or reactivates the grant.
    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// Replaces the network allow-list.
    #[must_use]
    pub fn allowed_ips<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_ips = Some(entries.into_iter().map(Into::into).collect());
        self
    }

    /// Applies the update to a grant in place.
    ///
    /// Validates allow-list entries first, so a bad entry leaves the grant
    /// untouched. Re-applies forced inheritance whenever the role or the
    /// permission set changes, and bumps `updated_at`.
    pub fn apply_to(&self, grant: &mut AdminRoleGrant) -> LumenResult<()> {
        let allowed_ips = self
            .allowed_ips
            .as_deref()
            .map(IpRule::parse_list)
            .transpose()?;

        if let Some(permissions) = &self.permissions {
            grant.permissions = permissions.clone();
            grant.apply_role_inheritance();
        }
        if let Some(role) = self.role {
            grant.change_role(role);
        }
        if let Some(expires_at) = self.expires_at {
            grant.expires_at = expires_at;
        }
        if let Some(active) = self.active {
            grant.active = active;
        }
        if let Some(allowed_ips) = allowed_ips {
            grant.allowed_ips = allowed_ips;
        }
        grant.touch();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use lumen_core::Permission;

    fn create_request() -> CreateGrant {
        CreateGrant::new(UserId::new(), AdminRole::Moderator, UserId::new())
    }

    #[test]
    fn test_into_grant_forces_inheritance() {
        let grant = create_request().into_grant().unwrap();
        assert!(grant.permissions.is_granted(Permission::ViewImages));
        assert!(grant.active);
        assert!(grant.expires_at.is_none());
        assert!(grant.allowed_ips.is_empty());
    }

    #[test]
    fn test_into_grant_rejects_bad_allow_list() {
        let request = create_request().with_allowed_ips(["10.0.0.0/24", "not-an-ip"]);
        let err = request.into_grant().unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_update_partial_semantics() {
        let mut grant = create_request().into_grant().unwrap();
        let before_role = grant.role;
        let before_ips = grant.allowed_ips.clone();

        GrantUpdate::new().active(false).apply_to(&mut grant).unwrap();

        assert!(!grant.active);
        assert_eq!(grant.role, before_role);
        assert_eq!(grant.allowed_ips, before_ips);
    }

    #[test]
    fn test_update_role_change_reapplies_inheritance() {
        let mut grant = create_request().into_grant().unwrap();
        assert!(!grant.permissions.is_granted(Permission::EditUsers));

        GrantUpdate::new()
            .role(AdminRole::Admin)
            .apply_to(&mut grant)
            .unwrap();
        assert!(grant.permissions.is_granted(Permission::EditUsers));
    }

    #[test]
    fn test_update_cannot_unset_inherited_keys() {
        let mut grant = create_request()
            .with_permissions(PermissionSet::from_iter([Permission::ExportData]))
            .into_grant()
            .unwrap();

        // Replacing the set with one that clears a moderator-tier key has no
        // effect on that key: inheritance is forced straight back.
        let mut stripped = PermissionSet::new();
        stripped.set(Permission::ViewImages, false);
        GrantUpdate::new()
            .permissions(stripped)
            .apply_to(&mut grant)
            .unwrap();

        assert!(grant.permissions.is_granted(Permission::ViewImages));
        // The explicit extra was part of the replaced set, so it is gone.
        assert!(!grant.permissions.is_granted(Permission::ExportData));
    }

    #[test]
    fn test_update_expiry_clear_vs_leave() {
        let mut grant = create_request()
            .with_expiry(Utc::now() + Duration::days(7))
            .into_grant()
            .unwrap();

        GrantUpdate::new().active(true).apply_to(&mut grant).unwrap();
        assert!(grant.expires_at.is_some());

        GrantUpdate::new().clear_expiry().apply_to(&mut grant).unwrap();
        assert!(grant.expires_at.is_none());
    }

    #[test]
    fn test_update_bad_allow_list_leaves_grant_untouched() {
        let mut grant = create_request().into_grant().unwrap();
        let before = grant.clone();

        let result = GrantUpdate::new()
            .role(AdminRole::Admin)
            .allowed_ips(["300.0.0.1"])
            .apply_to(&mut grant);

        assert!(result.is_err());
        assert_eq!(grant.role, before.role);
        assert_eq!(grant.permissions, before.permissions);
    }
}
