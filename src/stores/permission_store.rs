use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::errors::InternalError;
use crate::types::db::{permission, role, role_permission, user_role};

/// Data access for the `permissions` catalog
#[derive(Debug, Default, Clone, Copy)]
pub struct PermissionStore;

impl PermissionStore {
    pub fn new() -> Self {
        Self
    }

    /// The whole catalog, ordered by key
    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<permission::Model>, InternalError> {
        permission::Entity::find()
            .order_by_asc(permission::Column::Key)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_permissions", e))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        permission_id: i32,
    ) -> Result<Option<permission::Model>, InternalError> {
        permission::Entity::find_by_id(permission_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_permission_by_id", e))
    }

    pub async fn find_by_key(
        &self,
        conn: &impl ConnectionTrait,
        key: &str,
    ) -> Result<Option<permission::Model>, InternalError> {
        permission::Entity::find()
            .filter(permission::Column::Key.eq(key))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_permission_by_key", e))
    }

    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        key: &str,
        description: Option<String>,
    ) -> Result<permission::Model, InternalError> {
        permission::ActiveModel {
            key: Set(key.to_string()),
            description: Set(description),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_permission", e))
    }

    /// Distinct permission keys granted to a user through any of their roles
    pub async fn keys_for_user(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<Vec<String>, InternalError> {
        permission::Entity::find()
            .select_only()
            .column(permission::Column::Key)
            .distinct()
            .join(JoinType::InnerJoin, permission::Relation::RolePermission.def())
            .join(JoinType::InnerJoin, role_permission::Relation::Role.def())
            .join(JoinType::InnerJoin, role::Relation::UserRole.def())
            .filter(user_role::Column::UserId.eq(user_id))
            .order_by_asc(permission::Column::Key)
            .into_tuple::<String>()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_permission_keys_for_user", e))
    }

    pub async fn count(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        permission::Entity::find()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_permissions", e))
    }
}
