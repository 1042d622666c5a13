//! The authorization decision procedure.

use crate::network;
use crate::rbac::{AllowReason, DenyReason, Verdict};
use chrono::{DateTime, Utc};
use lumen_core::{LumenResult, Permission, UserId};
use lumen_repository::AdminRoleStore;
use std::sync::Arc;
use tracing::debug;

/// The subject of an authorization check.
///
/// The global super admin flag lives on the user record, outside the grant
/// pipeline; when set it is the unconditional top of the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    /// The user's ID.
    pub id: UserId,
    /// The global `isSuperAdmin` flag from the user record.
    pub is_super_admin: bool,
}

impl Principal {
    /// Creates a principal for a regular user.
    #[must_use]
    pub const fn user(id: UserId) -> Self {
        Self {
            id,
            is_super_admin: false,
        }
    }

    /// Creates a principal carrying the global super admin flag.
    #[must_use]
    pub const fn global_super_admin(id: UserId) -> Self {
        Self {
            id,
            is_super_admin: true,
        }
    }
}

/// Per-request context for an authorization check: the caller's network
/// address and the evaluation instant. Both are explicit parameters; the
/// engine never reads ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessContext {
    /// The client's textual network address.
    pub client_addr: String,
    /// The instant at which expiry is evaluated.
    pub now: DateTime<Utc>,
}

impl AccessContext {
    /// Creates a context evaluated at the current instant.
    #[must_use]
    pub fn new(client_addr: impl Into<String>) -> Self {
        Self::at(client_addr, Utc::now())
    }

    /// Creates a context evaluated at an explicit instant.
    #[must_use]
    pub fn at(client_addr: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            client_addr: client_addr.into(),
            now,
        }
    }
}

/// Combines the grant store, the role hierarchy, and the network matcher
/// into a single allow/deny decision.
///
/// Stateless between calls: every check re-reads the current grant. Store
/// failures surface as errors, never as a deny — callers must not conflate
/// "could not determine" with "determined: no".
#[derive(Debug, Clone)]
pub struct AuthorizationEngine<S: AdminRoleStore> {
    store: Arc<S>,
}

impl<S: AdminRoleStore> AuthorizationEngine<S> {
    /// Creates an engine backed by the given grant store.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Answers "may this user, from this network address, at this time,
    /// perform this action?".
    ///
    /// Check order is fixed: global flag, grant presence, suspension,
    /// expiry, network gate, then the effective permission set. Suspension,
    /// expiry, and the IP gate come before the permission lookup so a
    /// suspended or off-network super-admin-tier grant denies everything.
    pub async fn check(
        &self,
        principal: &Principal,
        permission: Permission,
        ctx: &AccessContext,
    ) -> LumenResult<Verdict> {
        if principal.is_super_admin {
            debug!("Allow {} for {}: global super admin", permission, principal.id);
            return Ok(Verdict::Allow(AllowReason::GlobalSuperAdmin));
        }

        let Some(grant) = self.store.get(principal.id).await? else {
            debug!("Deny {} for {}: no grant", permission, principal.id);
            return Ok(Verdict::Deny(DenyReason::NoGrant));
        };

        if !grant.active {
            debug!("Deny {} for {}: grant suspended", permission, principal.id);
            return Ok(Verdict::Deny(DenyReason::Suspended));
        }

        if grant.is_expired(ctx.now) {
            debug!("Deny {} for {}: grant expired", permission, principal.id);
            return Ok(Verdict::Deny(DenyReason::Expired));
        }

        if !network::matches(&ctx.client_addr, &grant.allowed_ips) {
            debug!(
                "Deny {} for {}: address {} not in allow-list",
                permission, principal.id, ctx.client_addr
            );
            return Ok(Verdict::Deny(DenyReason::IpRestricted));
        }

        if grant.has_permission(permission) {
            debug!("Allow {} for {}: granted", permission, principal.id);
            Ok(Verdict::Allow(AllowReason::Granted))
        } else {
            debug!("Deny {} for {}: permission not granted", permission, principal.id);
            Ok(Verdict::Deny(DenyReason::PermissionNotGranted))
        }
    }
}
