//! Store trait definitions.

use crate::{CreateGrant, GrantUpdate};
use async_trait::async_trait;
use lumen_core::{AdminRoleGrant, LumenResult, UserId};

/// Durable storage for admin role grant records, keyed by user.
///
/// The engine re-reads on every evaluation; no cached copy is authoritative
/// across processes. Implementations must serialize mutations for a given
/// user so concurrent writers never produce an inconsistent record.
#[async_trait]
pub trait AdminRoleStore: Send + Sync {
    /// Creates a grant for a user.
    ///
    /// Fails with a validation error if the user already holds a grant
    /// (re-granting requires `update` or an explicit prior `delete`) or if
    /// any allow-list entry fails to parse. The existing record, if any, is
    /// left untouched on failure.
    async fn create(&self, request: CreateGrant) -> LumenResult<AdminRoleGrant>;

    /// Applies a partial update to the user's grant.
    ///
    /// Fails with a not-found error if the user holds no grant.
    async fn update(&self, user_id: UserId, update: GrantUpdate) -> LumenResult<AdminRoleGrant>;

    /// Deletes the user's grant, removing all granted permissions
    /// immediately.
    ///
    /// Fails with a not-found error if the user holds no grant.
    async fn delete(&self, user_id: UserId) -> LumenResult<()>;

    /// Fetches the user's grant. Absence is a valid outcome, not an error.
    async fn get(&self, user_id: UserId) -> LumenResult<Option<AdminRoleGrant>>;

    /// Lists every grant for administrative review. Ordering is not
    /// semantically significant.
    async fn list_all(&self) -> LumenResult<Vec<AdminRoleGrant>>;
}
