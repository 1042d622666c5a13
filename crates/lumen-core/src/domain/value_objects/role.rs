//! Admin role value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::permission::Permission;

/// Admin role tiers with hierarchical permission inheritance.
///
/// The ordering is strict: every permission inherited by a lower tier is
/// also inherited by every higher tier, and `SuperAdmin` inherits the whole
/// catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Moderator with content review permissions.
    Moderator,
    /// Administrator with elevated management permissions.
    Admin,
    /// Super administrator (platform owner).
    SuperAdmin,
}

impl AdminRole {
    /// Returns the role's permission level (higher = more permissions).
    #[must_use]
    pub const fn level(&self) -> u8 {
        match self {
            Self::Moderator => 1,
            Self::Admin => 2,
            Self::SuperAdmin => 3,
        }
    }

    /// Checks if this role is at least as privileged as the required role.
    #[must_use]
    pub const fn at_least(&self, required: Self) -> bool {
        self.level() >= required.level()
    }

    /// Returns the set of permissions this role inherits unconditionally,
    /// independent of any stored grant.
    #[must_use]
    pub fn inherited_permissions(&self) -> Vec<Permission> {
        Permission::all()
            .iter()
            .copied()
            .filter(|p| p.is_inherited_for(*self))
            .collect()
    }

    /// Checks whether `permission` is inherited at this tier.
    #[must_use]
    pub fn inherits(&self, permission: Permission) -> bool {
        permission.is_inherited_for(*self)
    }

    /// Returns all available roles, lowest tier first.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Moderator, Self::Admin, Self::SuperAdmin]
    }

    /// Parses a role from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moderator" | "mod" => Some(Self::Moderator),
            "admin" | "administrator" => Some(Self::Admin),
            "superadmin" | "super_admin" | "superadministrator" => Some(Self::SuperAdmin),
            _ => None,
        }
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Moderator => write!(f, "moderator"),
            Self::Admin => write!(f, "admin"),
            Self::SuperAdmin => write!(f, "super_admin"),
        }
    }
}
