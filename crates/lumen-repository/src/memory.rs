//! In-memory grant store.

use crate::{AdminRoleStore, CreateGrant, GrantUpdate};
use async_trait::async_trait;
use lumen_core::{AdminRoleGrant, LumenError, LumenResult, UserId};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info};

/// In-memory implementation of [`AdminRoleStore`].
///
/// Backs tests and single-process embeddings. The write lock serializes all
/// mutations, which covers the per-user serialization requirement.
#[derive(Debug, Default)]
pub struct InMemoryRoleStore {
    grants: RwLock<HashMap<UserId, AdminRoleGrant>>,
}

impl InMemoryRoleStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored grants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.grants.read().len()
    }

    /// Checks whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grants.read().is_empty()
    }
}

#[async_trait]
impl AdminRoleStore for InMemoryRoleStore {
    async fn create(&self, request: CreateGrant) -> LumenResult<AdminRoleGrant> {
        debug!("Creating grant for user: {}", request.user_id);

        let user_id = request.user_id;
        // Validate before taking the write lock so a bad request never
        // touches the map.
        let grant = request.into_grant()?;

        let mut grants = self.grants.write();
        if grants.contains_key(&user_id) {
            return Err(LumenError::validation(format!(
                "User {} already has an admin role grant",
                user_id
            )));
        }
        grants.insert(user_id, grant.clone());

        info!("Grant created: {} for user {}", grant.id, user_id);
        Ok(grant)
    }

    async fn update(&self, user_id: UserId, update: GrantUpdate) -> LumenResult<AdminRoleGrant> {
        debug!("Updating grant for user: {}", user_id);

        let mut grants = self.grants.write();
        let grant = grants
            .get_mut(&user_id)
            .ok_or_else(|| LumenError::not_found("AdminRoleGrant", user_id))?;

        update.apply_to(grant)?;
        Ok(grant.clone())
    }

    async fn delete(&self, user_id: UserId) -> LumenResult<()> {
        debug!("Deleting grant for user: {}", user_id);

        let removed = self.grants.write().remove(&user_id);
        match removed {
            Some(grant) => {
                info!("Grant deleted: {} for user {}", grant.id, user_id);
                Ok(())
            }
            None => Err(LumenError::not_found("AdminRoleGrant", user_id)),
        }
    }

    async fn get(&self, user_id: UserId) -> LumenResult<Option<AdminRoleGrant>> {
        Ok(self.grants.read().get(&user_id).cloned())
    }

    async fn list_all(&self) -> LumenResult<Vec<AdminRoleGrant>> {
        Ok(self.grants.read().values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::AdminRole;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = InMemoryRoleStore::new();
        let user_id = UserId::new();

        let created = store
            .create(CreateGrant::new(user_id, AdminRole::Admin, UserId::new()))
            .await
            .unwrap();

        let fetched = store.get(user_id).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.role, AdminRole::Admin);
    }

    #[tokio::test]
    async fn test_get_absent_is_none_not_error() {
        let store = InMemoryRoleStore::new();
        assert!(store.get(UserId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_absent_is_not_found() {
        let store = InMemoryRoleStore::new();
        let err = store.delete(UserId::new()).await.unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }
}
