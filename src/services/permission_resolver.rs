use sea_orm::ConnectionTrait;
use std::sync::Arc;

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::stores::{PermissionStore, UserStore};
use crate::types::internal::PermissionSet;

/// Computes a user's effective permissions: the union of the keys granted by
/// every role assigned to them
pub struct PermissionResolver {
    user_store: Arc<UserStore>,
    permission_store: Arc<PermissionStore>,
}

impl PermissionResolver {
    pub fn new(user_store: Arc<UserStore>, permission_store: Arc<PermissionStore>) -> Self {
        Self {
            user_store,
            permission_store,
        }
    }

    /// Resolve the permission set of an active user
    ///
    /// # Errors
    /// * `CredentialError::ActiveUserNotFound` - user missing or deactivated
    pub async fn resolve(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<PermissionSet, InternalError> {
        let user = self
            .user_store
            .find_by_id(conn, user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or(CredentialError::ActiveUserNotFound { user_id })?;

        let keys = self.permission_store.keys_for_user(conn, user.id).await?;
        let permissions: PermissionSet = keys.into_iter().collect();

        tracing::debug!(
            "Resolved {} permission(s) for user {}",
            permissions.len(),
            user_id
        );

        Ok(permissions)
    }
}
