use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::errors::internal::RbacError;
use crate::stores::is_unique_violation;
use crate::types::db::{permission, role, role_permission, user_role};

/// Fields for a partial role update; `None` leaves the column untouched
#[derive(Debug, Default)]
pub struct RoleChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Data access for `roles` and `role_permissions`
#[derive(Debug, Default, Clone, Copy)]
pub struct RoleStore;

impl RoleStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        role_id: i32,
    ) -> Result<Option<role::Model>, InternalError> {
        role::Entity::find_by_id(role_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_role_by_id", e))
    }

    pub async fn find_by_name(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
    ) -> Result<Option<role::Model>, InternalError> {
        role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_role_by_name", e))
    }

    /// All roles with their permissions, ordered by id
    pub async fn list_with_permissions(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<(role::Model, Vec<permission::Model>)>, InternalError> {
        role::Entity::find()
            .order_by_asc(role::Column::Id)
            .find_with_related(permission::Entity)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_roles_with_permissions", e))
    }

    /// Permissions granted by a role, ordered by key
    pub async fn permissions_for_role(
        &self,
        conn: &impl ConnectionTrait,
        role: &role::Model,
    ) -> Result<Vec<permission::Model>, InternalError> {
        role.find_related(permission::Entity)
            .order_by_asc(permission::Column::Key)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_permissions_for_role", e))
    }

    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
        description: Option<String>,
    ) -> Result<role::Model, InternalError> {
        let new_role = role::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        new_role.insert(conn).await.map_err(|e| {
            if is_unique_violation(&e) {
                InternalError::Rbac(RbacError::DuplicateRoleName {
                    name: name.to_string(),
                })
            } else {
                InternalError::database("insert_role", e)
            }
        })
    }

    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        existing: role::Model,
        changes: RoleChanges,
    ) -> Result<role::Model, InternalError> {
        if changes.name.is_none() && changes.description.is_none() {
            return Ok(existing);
        }

        let mut active: role::ActiveModel = existing.into();
        if let Some(name) = &changes.name {
            active.name = Set(name.clone());
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }

        active.update(conn).await.map_err(|e| {
            if is_unique_violation(&e) {
                InternalError::Rbac(RbacError::DuplicateRoleName {
                    name: changes.name.clone().unwrap_or_default(),
                })
            } else {
                InternalError::database("update_role", e)
            }
        })
    }

    /// Delete a role with its user and permission assignments; false when no row existed
    pub async fn delete(
        &self,
        conn: &impl ConnectionTrait,
        role_id: i32,
    ) -> Result<bool, InternalError> {
        role_permission::Entity::delete_many()
            .filter(role_permission::Column::RoleId.eq(role_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_role_permissions", e))?;

        user_role::Entity::delete_many()
            .filter(user_role::Column::RoleId.eq(role_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_role_assignments", e))?;

        let result = role::Entity::delete_by_id(role_id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_role", e))?;

        Ok(result.rows_affected > 0)
    }

    /// Replace the role's permission set; ids that do not name an existing permission are skipped
    pub async fn replace_permissions(
        &self,
        conn: &impl ConnectionTrait,
        role_id: i32,
        permission_ids: &[i32],
    ) -> Result<(), InternalError> {
        role_permission::Entity::delete_many()
            .filter(role_permission::Column::RoleId.eq(role_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("clear_role_permissions", e))?;

        if permission_ids.is_empty() {
            return Ok(());
        }

        let existing = permission::Entity::find()
            .filter(permission::Column::Id.is_in(permission_ids.iter().copied()))
            .order_by_asc(permission::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_permissions_by_ids", e))?;

        if existing.is_empty() {
            return Ok(());
        }

        let rows = existing.into_iter().map(|p| role_permission::ActiveModel {
            role_id: Set(role_id),
            permission_id: Set(p.id),
        });

        role_permission::Entity::insert_many(rows)
            .exec_without_returning(conn)
            .await
            .map_err(|e| InternalError::database("insert_role_permissions", e))?;

        Ok(())
    }

    pub async fn has_permission(
        &self,
        conn: &impl ConnectionTrait,
        role_id: i32,
        permission_id: i32,
    ) -> Result<bool, InternalError> {
        let row = role_permission::Entity::find_by_id((role_id, permission_id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_role_permission", e))?;

        Ok(row.is_some())
    }

    pub async fn add_permission(
        &self,
        conn: &impl ConnectionTrait,
        role_id: i32,
        permission_id: i32,
    ) -> Result<(), InternalError> {
        let row = role_permission::ActiveModel {
            role_id: Set(role_id),
            permission_id: Set(permission_id),
        };

        role_permission::Entity::insert(row)
            .exec_without_returning(conn)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    InternalError::Rbac(RbacError::PermissionAlreadyAssigned {
                        role_id,
                        permission_id,
                    })
                } else {
                    InternalError::database("insert_role_permission", e)
                }
            })?;

        Ok(())
    }

    /// Returns false when the pair was not assigned
    pub async fn remove_permission(
        &self,
        conn: &impl ConnectionTrait,
        role_id: i32,
        permission_id: i32,
    ) -> Result<bool, InternalError> {
        let result = role_permission::Entity::delete_by_id((role_id, permission_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_role_permission", e))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        role::Entity::find()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_roles", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::PermissionStore;
    use crate::test::utils::setup_test_db;

    #[tokio::test]
    async fn test_duplicate_role_name_is_rbac_error() {
        let db = setup_test_db().await;
        let store = RoleStore::new();

        store.insert(&db, "Viewer", None).await.unwrap();
        let err = store.insert(&db, "Viewer", None).await.unwrap_err();

        assert!(matches!(
            err,
            InternalError::Rbac(RbacError::DuplicateRoleName { .. })
        ));
    }

    #[tokio::test]
    async fn test_add_and_remove_permission() {
        let db = setup_test_db().await;
        let roles = RoleStore::new();
        let permissions = PermissionStore::new();

        let role = roles.insert(&db, "Viewer", None).await.unwrap();
        let perm = permissions.insert(&db, "users.view", Some("View users".to_string())).await.unwrap();

        roles.add_permission(&db, role.id, perm.id).await.unwrap();
        assert!(roles.has_permission(&db, role.id, perm.id).await.unwrap());

        let again = roles.add_permission(&db, role.id, perm.id).await.unwrap_err();
        assert!(matches!(
            again,
            InternalError::Rbac(RbacError::PermissionAlreadyAssigned { .. })
        ));

        assert!(roles.remove_permission(&db, role.id, perm.id).await.unwrap());
        assert!(!roles.remove_permission(&db, role.id, perm.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_permissions_for_role_sorted_by_key() {
        let db = setup_test_db().await;
        let roles = RoleStore::new();
        let permissions = PermissionStore::new();

        let role = roles.insert(&db, "Ops", None).await.unwrap();
        let users_view = permissions.insert(&db, "users.view", None).await.unwrap();
        let dashboard = permissions.insert(&db, "dashboard.access", None).await.unwrap();

        roles
            .replace_permissions(&db, role.id, &[users_view.id, dashboard.id, 404])
            .await
            .unwrap();

        let keys: Vec<String> = roles
            .permissions_for_role(&db, &role)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.key)
            .collect();
        assert_eq!(keys, vec!["dashboard.access", "users.view"]);
    }

    #[tokio::test]
    async fn test_update_without_changes_returns_existing() {
        let db = setup_test_db().await;
        let store = RoleStore::new();

        let role = store.insert(&db, "Support", Some("Helpdesk".to_string())).await.unwrap();
        let same = store.update(&db, role.clone(), RoleChanges::default()).await.unwrap();

        assert_eq!(same, role);
    }
}
