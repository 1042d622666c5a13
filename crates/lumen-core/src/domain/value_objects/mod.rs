//! Domain value objects.

pub mod ip_rule;
pub mod permission;
pub mod role;

pub use ip_rule::{IpRule, IpRuleError};
pub use permission::{Permission, PermissionGroup, PermissionSet};
pub use role::AdminRole;
