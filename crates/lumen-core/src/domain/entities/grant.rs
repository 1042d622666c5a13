//! Admin role grant entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{AdminRole, IpRule, Permission, PermissionSet};
use crate::{GrantId, UserId};

/// A scoped, revocable, time-bound admin role assignment for one user.
///
/// The stored permission set is always kept a superset of the role's
/// inherited set: creation and every role change force the inherited keys to
/// `true` (see [`Self::apply_role_inheritance`]), and evaluation unions the
/// inherited set again, so stored state and read-time results agree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRoleGrant {
    /// Unique identifier for the grant record.
    pub id: GrantId,

    /// The subject of the grant. At most one record per user is kept.
    pub user_id: UserId,

    /// The granted role tier.
    pub role: AdminRole,

    /// Explicit permission overrides layered on top of the role's inherited
    /// set.
    pub permissions: PermissionSet,

    /// The super admin who created the grant (audit display only; never
    /// evaluated).
    pub granted_by: UserId,

    /// Optional expiry; `None` means the grant never expires.
    pub expires_at: Option<DateTime<Utc>>,

    /// Suspension flag; `false` keeps the record but denies everything.
    pub active: bool,

    /// Ordered allow-list of network rules; empty means unrestricted.
    pub allowed_ips: Vec<IpRule>,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl AdminRoleGrant {
    /// Creates a new grant, forcing the role's inherited permissions to
    /// `true` in the stored set.
    #[must_use]
    pub fn new(
        user_id: UserId,
        role: AdminRole,
        permissions: PermissionSet,
        granted_by: UserId,
    ) -> Self {
        let now = Utc::now();
        let mut grant = Self {
            id: GrantId::new(),
            user_id,
            role,
            permissions,
            granted_by,
            expires_at: None,
            active: true,
            allowed_ips: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        grant.apply_role_inheritance();
        grant
    }

    /// Forces every permission inherited by the current role to `true` in
    /// the stored set.
    ///
    /// Performed at creation and at every role change, not only at read
    /// time, so stored state never drifts from what evaluation computes.
    /// Explicit extras outside the inherited set are left untouched, also
    /// across downgrades.
    pub fn apply_role_inheritance(&mut self) {
        self.permissions.grant_all(self.role.inherited_permissions());
    }

    /// Changes the role tier and re-applies forced inheritance.
    pub fn change_role(&mut self, role: AdminRole) {
        self.role = role;
        self.apply_role_inheritance();
    }

    /// Returns the grant's effective permission set: the union of the stored
    /// overrides and the role's inherited set.
    #[must_use]
    pub fn effective_permissions(&self) -> PermissionSet {
        self.permissions.effective_for(self.role)
    }

    /// Checks whether the effective set contains `permission`.
    #[must_use]
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.is_granted(permission) || self.role.inherits(permission)
    }

    /// Checks whether the grant has expired as of `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }

    /// Checks whether the grant is in force as of `now`: active and not
    /// expired. Network restrictions are a per-request gate, not part of
    /// this state.
    #[must_use]
    pub fn is_effective(&self, now: DateTime<Utc>) -> bool {
        self.active && !self.is_expired(now)
    }

    /// Marks the entity as updated.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
