//! Authorization verdicts and reason codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a check allowed the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllowReason {
    /// The user carries the global super admin flag; the grant pipeline was
    /// bypassed entirely.
    GlobalSuperAdmin,
    /// The permission is in the grant's effective set.
    Granted,
}

/// Why a check denied the action.
///
/// Callers must treat every deny the same way (forbidden); the reason exists
/// for logging and UX messaging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DenyReason {
    /// The user holds no grant record.
    NoGrant,
    /// The grant is suspended (`active == false`).
    Suspended,
    /// The grant's expiry is in the past.
    Expired,
    /// The client address did not match the grant's allow-list.
    IpRestricted,
    /// The permission is not in the grant's effective set.
    PermissionNotGranted,
}

/// The outcome of an authorization check: allow or deny, with a reason code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "UPPERCASE")]
pub enum Verdict {
    /// The action is permitted.
    Allow(AllowReason),
    /// The action is forbidden.
    Deny(DenyReason),
}

impl Verdict {
    /// Checks whether the verdict permits the action.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }

    /// Returns the kebab-case reason code.
    #[must_use]
    pub const fn reason_code(&self) -> &'static str {
        match self {
            Self::Allow(AllowReason::GlobalSuperAdmin) => "global-super-admin",
            Self::Allow(AllowReason::Granted) => "granted",
            Self::Deny(DenyReason::NoGrant) => "no-grant",
            Self::Deny(DenyReason::Suspended) => "suspended",
            Self::Deny(DenyReason::Expired) => "expired",
            Self::Deny(DenyReason::IpRestricted) => "ip-restricted",
            Self::Deny(DenyReason::PermissionNotGranted) => "permission-not-granted",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow(_) => write!(f, "ALLOW ({})", self.reason_code()),
            Self::Deny(_) => write!(f, "DENY ({})", self.reason_code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_allowed() {
        assert!(Verdict::Allow(AllowReason::Granted).is_allowed());
        assert!(Verdict::Allow(AllowReason::GlobalSuperAdmin).is_allowed());
        assert!(!Verdict::Deny(DenyReason::Expired).is_allowed());
    }

    #[test]
    fn test_reason_codes() {
        assert_eq!(
            Verdict::Allow(AllowReason::GlobalSuperAdmin).reason_code(),
            "global-super-admin"
        );
        assert_eq!(Verdict::Allow(AllowReason::Granted).reason_code(), "granted");
        assert_eq!(Verdict::Deny(DenyReason::NoGrant).reason_code(), "no-grant");
        assert_eq!(Verdict::Deny(DenyReason::Suspended).reason_code(), "suspended");
        assert_eq!(Verdict::Deny(DenyReason::Expired).reason_code(), "expired");
        assert_eq!(
            Verdict::Deny(DenyReason::IpRestricted).reason_code(),
            "ip-restricted"
        );
        assert_eq!(
            Verdict::Deny(DenyReason::PermissionNotGranted).reason_code(),
            "permission-not-granted"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Verdict::Deny(DenyReason::Expired).to_string(),
            "DENY (expired)"
        );
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_value(Verdict::Deny(DenyReason::IpRestricted)).unwrap();
        assert_eq!(json["verdict"], "DENY");
        assert_eq!(json["reason"], "ip-restricted");
    }
}
