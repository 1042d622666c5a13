//! Permission catalog and permission sets.
//!
//! The catalog is a fixed, closed set of keys. Adding a capability to the
//! platform means adding a variant here and assigning its tier in
//! [`Permission::minimum_role`] — both explicit, reviewed changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::role::AdminRole;

/// A permission key from the platform's closed catalog.
///
/// Keys serialize as the platform's camelCase identifiers (`"viewUsers"`).
/// Grouping exists for display purposes only and carries no authorization
/// semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Permission {
    // User permissions
    ViewUsers,
    EditUsers,
    DeleteUsers,
    BanUsers,
    UnbanUsers,

    // Image permissions
    ViewImages,
    EditImages,
    DeleteImages,
    ModerateImages,

    // Category permissions
    ViewCategories,
    CreateCategories,
    EditCategories,
    DeleteCategories,

    // Admin management permissions
    ViewAdmins,
    CreateAdmins,
    EditAdmins,
    DeleteAdmins,

    // Dashboard and analytics permissions
    ViewDashboard,
    ViewAnalytics,

    // Collection and favorite permissions
    ViewCollections,
    ManageCollections,
    ManageFavorites,

    // Moderation permissions
    ModerateContent,

    // System permissions
    ViewLogs,
    ExportData,
    ManageSettings,
}

impl Permission {
    const ALL: &'static [Self] = &[
        Self::ViewUsers,
        Self::EditUsers,
        Self::DeleteUsers,
        Self::BanUsers,
        Self::UnbanUsers,
        Self::ViewImages,
        Self::EditImages,
        Self::DeleteImages,
        Self::ModerateImages,
        Self::ViewCategories,
        Self::CreateCategories,
        Self::EditCategories,
        Self::DeleteCategories,
        Self::ViewAdmins,
        Self::CreateAdmins,
        Self::EditAdmins,
        Self::DeleteAdmins,
        Self::ViewDashboard,
        Self::ViewAnalytics,
        Self::ViewCollections,
        Self::ManageCollections,
        Self::ManageFavorites,
        Self::ModerateContent,
        Self::ViewLogs,
        Self::ExportData,
        Self::ManageSettings,
    ];

    /// Returns the full, closed catalog of permission keys.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        Self::ALL
    }

    /// Returns the lowest role tier that inherits this permission
    /// unconditionally.
    ///
    /// Keys mapped to [`AdminRole::SuperAdmin`] are optional for the lower
    /// tiers: they are never inherited there and must be granted explicitly
    /// on the individual grant record.
    #[must_use]
    pub const fn minimum_role(&self) -> AdminRole {
        match self {
            // Moderators review users and content.
            Self::ViewUsers
            | Self::ViewImages
            | Self::EditImages
            | Self::ModerateImages
            | Self::ViewCategories
            | Self::ViewDashboard
            | Self::ModerateContent => AdminRole::Moderator,

            // Admins manage users, taxonomy, and curation.
            Self::EditUsers
            | Self::BanUsers
            | Self::UnbanUsers
            | Self::DeleteImages
            | Self::CreateCategories
            | Self::EditCategories
            | Self::DeleteCategories
            | Self::ViewAnalytics
            | Self::ViewCollections
            | Self::ManageCollections
            | Self::ManageFavorites
            | Self::ViewAdmins => AdminRole::Admin,

            // Destructive and platform-level keys stay at the top tier.
            Self::DeleteUsers
            | Self::CreateAdmins
            | Self::EditAdmins
            | Self::DeleteAdmins
            | Self::ViewLogs
            | Self::ExportData
            | Self::ManageSettings => AdminRole::SuperAdmin,
        }
    }

    /// Checks whether the given role inherits this permission.
    #[must_use]
    pub const fn is_inherited_for(&self, role: AdminRole) -> bool {
        role.at_least(self.minimum_role())
    }

    /// Returns the lowest tier at or below `role` that inherits this key,
    /// or `None` when the key is a genuinely optional, explicitly-granted
    /// permission for that role.
    ///
    /// Used by administrative UIs to explain why a checkbox is locked.
    #[must_use]
    pub const fn inherited_from(&self, role: AdminRole) -> Option<AdminRole> {
        if self.is_inherited_for(role) {
            Some(self.minimum_role())
        } else {
            None
        }
    }

    /// Returns the display grouping of the catalog, in presentation order.
    #[must_use]
    pub const fn groups() -> &'static [PermissionGroup] {
        Self::GROUPS
    }

    const GROUPS: &'static [PermissionGroup] = &[
        PermissionGroup {
            label: "Users",
            permissions: &[
                Permission::ViewUsers,
                Permission::EditUsers,
                Permission::DeleteUsers,
                Permission::BanUsers,
                Permission::UnbanUsers,
            ],
        },
        PermissionGroup {
            label: "Images",
            permissions: &[
                Permission::ViewImages,
                Permission::EditImages,
                Permission::DeleteImages,
                Permission::ModerateImages,
            ],
        },
        PermissionGroup {
            label: "Categories",
            permissions: &[
                Permission::ViewCategories,
                Permission::CreateCategories,
                Permission::EditCategories,
                Permission::DeleteCategories,
            ],
        },
        PermissionGroup {
            label: "Admin management",
            permissions: &[
                Permission::ViewAdmins,
                Permission::CreateAdmins,
                Permission::EditAdmins,
                Permission::DeleteAdmins,
            ],
        },
        PermissionGroup {
            label: "Dashboard & analytics",
            permissions: &[Permission::ViewDashboard, Permission::ViewAnalytics],
        },
        PermissionGroup {
            label: "Collections & favorites",
            permissions: &[
                Permission::ViewCollections,
                Permission::ManageCollections,
                Permission::ManageFavorites,
            ],
        },
        PermissionGroup {
            label: "Moderation",
            permissions: &[Permission::ModerateContent],
        },
        PermissionGroup {
            label: "System",
            permissions: &[
                Permission::ViewLogs,
                Permission::ExportData,
                Permission::ManageSettings,
            ],
        },
    ];
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ViewUsers => write!(f, "viewUsers"),
            Self::EditUsers => write!(f, "editUsers"),
            Self::DeleteUsers => write!(f, "deleteUsers"),
            Self::BanUsers => write!(f, "banUsers"),
            Self::UnbanUsers => write!(f, "unbanUsers"),
            Self::ViewImages => write!(f, "viewImages"),
            Self::EditImages => write!(f, "editImages"),
            Self::DeleteImages => write!(f, "deleteImages"),
            Self::ModerateImages => write!(f, "moderateImages"),
            Self::ViewCategories => write!(f, "viewCategories"),
            Self::CreateCategories => write!(f, "createCategories"),
            Self::EditCategories => write!(f, "editCategories"),
            Self::DeleteCategories => write!(f, "deleteCategories"),
            Self::ViewAdmins => write!(f, "viewAdmins"),
            Self::CreateAdmins => write!(f, "createAdmins"),
            Self::EditAdmins => write!(f, "editAdmins"),
            Self::DeleteAdmins => write!(f, "deleteAdmins"),
            Self::ViewDashboard => write!(f, "viewDashboard"),
            Self::ViewAnalytics => write!(f, "viewAnalytics"),
            Self::ViewCollections => write!(f, "viewCollections"),
            Self::ManageCollections => write!(f, "manageCollections"),
            Self::ManageFavorites => write!(f, "manageFavorites"),
            Self::ModerateContent => write!(f, "moderateContent"),
            Self::ViewLogs => write!(f, "viewLogs"),
            Self::ExportData => write!(f, "exportData"),
            Self::ManageSettings => write!(f, "manageSettings"),
        }
    }
}

/// A named display group of permission keys.
#[derive(Debug, Clone, Copy)]
pub struct PermissionGroup {
    /// Human-readable group label.
    pub label: &'static str,
    /// Keys in the group, in presentation order.
    pub permissions: &'static [Permission],
}

/// A mapping from permission keys to booleans.
///
/// Keys not present read as `false`. Serializes as a flat key→bool JSON map,
/// the shape the platform persists on each grant record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeMap<Permission, bool>);

impl PermissionSet {
    /// Creates an empty permission set.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Checks whether the given permission is granted.
    #[must_use]
    pub fn is_granted(&self, permission: Permission) -> bool {
        self.0.get(&permission).copied().unwrap_or(false)
    }

    /// Sets a permission explicitly.
    pub fn set(&mut self, permission: Permission, granted: bool) {
        self.0.insert(permission, granted);
    }

    /// Grants a permission.
    pub fn grant(&mut self, permission: Permission) {
        self.set(permission, true);
    }

    /// Grants every permission in the iterator.
    pub fn grant_all<I: IntoIterator<Item = Permission>>(&mut self, permissions: I) {
        for permission in permissions {
            self.grant(permission);
        }
    }

    /// Returns the keys currently granted (`true`), in catalog order.
    pub fn granted(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0
            .iter()
            .filter_map(|(p, granted)| granted.then_some(*p))
    }

    /// Counts the granted keys.
    #[must_use]
    pub fn granted_count(&self) -> usize {
        self.granted().count()
    }

    /// Checks whether no key is granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.granted_count() == 0
    }

    /// Returns the union of this set with the permissions inherited by
    /// `role` — the grant's effective permission set.
    #[must_use]
    pub fn effective_for(&self, role: AdminRole) -> Self {
        let mut effective = self.clone();
        effective.grant_all(role.inherited_permissions());
        effective
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        let mut set = Self::new();
        set.grant_all(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_closed_and_fixed() {
        assert_eq!(Permission::all().len(), 26);
    }

    #[test]
    fn test_groups_cover_catalog_exactly_once() {
        let mut seen: Vec<Permission> = Permission::groups()
            .iter()
            .flat_map(|g| g.permissions.iter().copied())
            .collect();
        seen.sort();
        let mut catalog: Vec<Permission> = Permission::all().to_vec();
        catalog.sort();
        assert_eq!(seen, catalog);
    }

    #[test]
    fn test_minimum_role_samples() {
        assert_eq!(Permission::ViewUsers.minimum_role(), AdminRole::Moderator);
        assert_eq!(Permission::EditUsers.minimum_role(), AdminRole::Admin);
        assert_eq!(Permission::DeleteUsers.minimum_role(), AdminRole::SuperAdmin);
        assert_eq!(Permission::ExportData.minimum_role(), AdminRole::SuperAdmin);
    }

    #[test]
    fn test_is_inherited_for() {
        assert!(Permission::ViewUsers.is_inherited_for(AdminRole::Moderator));
        assert!(Permission::ViewUsers.is_inherited_for(AdminRole::SuperAdmin));
        assert!(!Permission::EditUsers.is_inherited_for(AdminRole::Moderator));
        assert!(Permission::EditUsers.is_inherited_for(AdminRole::Admin));
        assert!(!Permission::ManageSettings.is_inherited_for(AdminRole::Admin));
    }

    #[test]
    fn test_inherited_from_reports_lowest_tier() {
        assert_eq!(
            Permission::ViewUsers.inherited_from(AdminRole::Admin),
            Some(AdminRole::Moderator)
        );
        assert_eq!(
            Permission::EditUsers.inherited_from(AdminRole::Admin),
            Some(AdminRole::Admin)
        );
        assert_eq!(Permission::ExportData.inherited_from(AdminRole::Admin), None);
        assert_eq!(
            Permission::ExportData.inherited_from(AdminRole::SuperAdmin),
            Some(AdminRole::SuperAdmin)
        );
    }

    #[test]
    fn test_permission_display_matches_platform_keys() {
        assert_eq!(Permission::ViewUsers.to_string(), "viewUsers");
        assert_eq!(Permission::ManageSettings.to_string(), "manageSettings");
    }

    #[test]
    fn test_permission_serialization() {
        let json = serde_json::to_string(&Permission::ModerateImages).unwrap();
        assert_eq!(json, "\"moderateImages\"");
        let parsed: Permission = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Permission::ModerateImages);
    }

    #[test]
    fn test_display_agrees_with_serde() {
        for permission in Permission::all() {
            let json = serde_json::to_string(permission).unwrap();
            assert_eq!(json, format!("\"{}\"", permission));
        }
    }

    #[test]
    fn test_permission_set_missing_keys_read_false() {
        let set = PermissionSet::new();
        assert!(!set.is_granted(Permission::ViewUsers));
        assert!(set.is_empty());
    }

    #[test]
    fn test_permission_set_grant_and_revoke() {
        let mut set = PermissionSet::new();
        set.grant(Permission::ExportData);
        assert!(set.is_granted(Permission::ExportData));

        set.set(Permission::ExportData, false);
        assert!(!set.is_granted(Permission::ExportData));
    }

    #[test]
    fn test_effective_for_unions_inherited() {
        let set = PermissionSet::from_iter([Permission::ExportData]);
        let effective = set.effective_for(AdminRole::Moderator);

        assert!(effective.is_granted(Permission::ExportData));
        assert!(effective.is_granted(Permission::ViewImages));
        assert!(!effective.is_granted(Permission::DeleteUsers));

        let expected_count = AdminRole::Moderator.inherited_permissions().len() + 1;
        assert_eq!(effective.granted_count(), expected_count);
    }

    #[test]
    fn test_permission_set_serializes_as_flat_map() {
        let set = PermissionSet::from_iter([Permission::ViewUsers, Permission::ExportData]);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["viewUsers"], true);
        assert_eq!(json["exportData"], true);

        let parsed: PermissionSet = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, set);
    }
}
