use std::sync::Arc;

use crate::app_data::AppData;
use crate::config::{begin_transaction, commit_transaction};
use crate::errors::InternalError;
use crate::errors::internal::RbacError;
use crate::services::input_validation::{non_blank, validate_role_name};
use crate::stores::role_store::RoleChanges;
use crate::stores::{PermissionStore, RoleStore};
use crate::types::db::{permission, role};

/// A role together with the permissions it grants
#[derive(Debug, Clone)]
pub struct RoleWithPermissions {
    pub role: role::Model,
    pub permissions: Vec<permission::Model>,
}

#[derive(Debug, Clone)]
pub struct NewRole {
    pub name: String,
    pub description: Option<String>,
    pub permission_ids: Vec<i32>,
}

/// Partial update; `permission_ids: Some(vec![])` clears the role's permissions
#[derive(Debug, Clone, Default)]
pub struct RoleUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permission_ids: Option<Vec<i32>>,
}

/// CRUD over roles and their permission grants
pub struct RoleService {
    app_data: Arc<AppData>,
    role_store: Arc<RoleStore>,
    permission_store: Arc<PermissionStore>,
}

impl RoleService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            role_store: app_data.role_store.clone(),
            permission_store: app_data.permission_store.clone(),
            app_data,
        }
    }

    pub async fn list(&self) -> Result<Vec<RoleWithPermissions>, InternalError> {
        let rows = self
            .role_store
            .list_with_permissions(&self.app_data.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(role, mut permissions)| {
                permissions.sort_by(|a, b| a.key.cmp(&b.key));
                RoleWithPermissions { role, permissions }
            })
            .collect())
    }

    pub async fn get(&self, role_id: i32) -> Result<RoleWithPermissions, InternalError> {
        let conn = &self.app_data.db;

        let role = self
            .role_store
            .find_by_id(conn, role_id)
            .await?
            .ok_or(RbacError::RoleNotFound { role_id })?;
        let permissions = self.role_store.permissions_for_role(conn, &role).await?;

        Ok(RoleWithPermissions { role, permissions })
    }

    /// Create a role with the given permissions in one transaction
    pub async fn create(&self, new_role: NewRole) -> Result<RoleWithPermissions, InternalError> {
        validate_role_name(&new_role.name)?;

        let txn = begin_transaction(&self.app_data.db).await?;

        if self
            .role_store
            .find_by_name(&txn, &new_role.name)
            .await?
            .is_some()
        {
            return Err(RbacError::DuplicateRoleName {
                name: new_role.name,
            }
            .into());
        }

        let role = self
            .role_store
            .insert(&txn, &new_role.name, new_role.description)
            .await?;

        if !new_role.permission_ids.is_empty() {
            self.role_store
                .replace_permissions(&txn, role.id, &new_role.permission_ids)
                .await?;
        }

        let permissions = self.role_store.permissions_for_role(&txn, &role).await?;
        commit_transaction(txn).await?;

        tracing::info!(role_id = role.id, "Created role '{}'", role.name);

        Ok(RoleWithPermissions { role, permissions })
    }

    pub async fn update(
        &self,
        role_id: i32,
        update: RoleUpdate,
    ) -> Result<RoleWithPermissions, InternalError> {
        let name = non_blank(update.name);
        if let Some(name) = &name {
            validate_role_name(name)?;
        }

        let txn = begin_transaction(&self.app_data.db).await?;

        let existing = self
            .role_store
            .find_by_id(&txn, role_id)
            .await?
            .ok_or(RbacError::RoleNotFound { role_id })?;

        let name = name.filter(|n| *n != existing.name);
        if let Some(name) = &name {
            if self.role_store.find_by_name(&txn, name).await?.is_some() {
                return Err(RbacError::DuplicateRoleName { name: name.clone() }.into());
            }
        }

        let role = self
            .role_store
            .update(
                &txn,
                existing,
                RoleChanges {
                    name,
                    description: update.description,
                },
            )
            .await?;

        if let Some(permission_ids) = &update.permission_ids {
            self.role_store
                .replace_permissions(&txn, role.id, permission_ids)
                .await?;
        }

        let permissions = self.role_store.permissions_for_role(&txn, &role).await?;
        commit_transaction(txn).await?;

        tracing::info!(role_id = role.id, "Updated role");

        Ok(RoleWithPermissions { role, permissions })
    }

    /// Delete a role; users holding it lose the permissions it granted
    pub async fn delete(&self, role_id: i32) -> Result<(), InternalError> {
        let txn = begin_transaction(&self.app_data.db).await?;

        if !self.role_store.delete(&txn, role_id).await? {
            return Err(RbacError::RoleNotFound { role_id }.into());
        }

        commit_transaction(txn).await?;
        tracing::info!(role_id, "Deleted role");

        Ok(())
    }

    pub async fn list_permissions(
        &self,
        role_id: i32,
    ) -> Result<Vec<permission::Model>, InternalError> {
        Ok(self.get(role_id).await?.permissions)
    }

    /// Grant a single permission
    ///
    /// # Errors
    /// * `RbacError::RoleNotFound` / `RbacError::PermissionNotFound`
    /// * `RbacError::PermissionAlreadyAssigned` - pair already exists
    pub async fn add_permission(
        &self,
        role_id: i32,
        permission_id: i32,
    ) -> Result<(), InternalError> {
        let txn = begin_transaction(&self.app_data.db).await?;

        self.role_store
            .find_by_id(&txn, role_id)
            .await?
            .ok_or(RbacError::RoleNotFound { role_id })?;
        self.permission_store
            .find_by_id(&txn, permission_id)
            .await?
            .ok_or(RbacError::PermissionNotFound { permission_id })?;

        if self
            .role_store
            .has_permission(&txn, role_id, permission_id)
            .await?
        {
            return Err(RbacError::PermissionAlreadyAssigned {
                role_id,
                permission_id,
            }
            .into());
        }

        self.role_store
            .add_permission(&txn, role_id, permission_id)
            .await?;
        commit_transaction(txn).await?;

        tracing::info!(role_id, permission_id, "Granted permission to role");

        Ok(())
    }

    /// Revoke a single permission; the pair must exist
    pub async fn remove_permission(
        &self,
        role_id: i32,
        permission_id: i32,
    ) -> Result<(), InternalError> {
        let txn = begin_transaction(&self.app_data.db).await?;

        let removed = self
            .role_store
            .remove_permission(&txn, role_id, permission_id)
            .await?;

        if !removed {
            return Err(RbacError::PermissionNotAssigned {
                role_id,
                permission_id,
            }
            .into());
        }

        commit_transaction(txn).await?;

        tracing::info!(role_id, permission_id, "Revoked permission from role");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::UserService;
    use crate::services::user_service::NewUser;
    use crate::test::utils::{
        create_test_user, ensure_permission, role_ids_for_user, setup_test_app_data,
    };
    use crate::types::internal::Permission;

    fn keys(permissions: &[permission::Model]) -> Vec<&str> {
        permissions.iter().map(|p| p.key.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_role_with_permissions() {
        let app_data = setup_test_app_data().await;
        let view = ensure_permission(&app_data, Permission::UsersView).await;
        let dash = ensure_permission(&app_data, Permission::DashboardAccess).await;
        let service = RoleService::new(app_data);

        let created = service
            .create(NewRole {
                name: "Viewer".to_string(),
                description: Some("Read only".to_string()),
                permission_ids: vec![view.id, dash.id, 12345],
            })
            .await
            .unwrap();

        assert_eq!(created.role.name, "Viewer");
        assert_eq!(keys(&created.permissions), vec!["dashboard.access", "users.view"]);
    }

    #[tokio::test]
    async fn test_empty_description_is_kept_on_create_and_update() {
        let app_data = setup_test_app_data().await;
        let service = RoleService::new(app_data);

        let created = service
            .create(NewRole {
                name: "Blank".to_string(),
                description: Some(String::new()),
                permission_ids: vec![],
            })
            .await
            .unwrap();
        assert_eq!(created.role.description, Some(String::new()));

        let updated = service
            .update(
                created.role.id,
                RoleUpdate {
                    description: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.role.description, Some(String::new()));
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let app_data = setup_test_app_data().await;
        let service = RoleService::new(app_data);
        let role = NewRole {
            name: "Viewer".to_string(),
            description: None,
            permission_ids: vec![],
        };

        service.create(role.clone()).await.unwrap();
        assert!(matches!(
            service.create(role).await.unwrap_err(),
            InternalError::Rbac(RbacError::DuplicateRoleName { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_with_empty_list_clears_and_omitted_list_keeps() {
        let app_data = setup_test_app_data().await;
        let view = ensure_permission(&app_data, Permission::UsersView).await;
        let service = RoleService::new(app_data);

        let created = service
            .create(NewRole {
                name: "Viewer".to_string(),
                description: None,
                permission_ids: vec![view.id],
            })
            .await
            .unwrap();

        let renamed = service
            .update(
                created.role.id,
                RoleUpdate {
                    name: Some("Readers".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.role.name, "Readers");
        assert_eq!(keys(&renamed.permissions), vec!["users.view"]);

        let cleared = service
            .update(
                created.role.id,
                RoleUpdate {
                    permission_ids: Some(vec![]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(cleared.permissions.is_empty());
        assert_eq!(cleared.role.name, "Readers");
    }

    #[tokio::test]
    async fn test_delete_role_revokes_permissions_from_holders() {
        let app_data = setup_test_app_data().await;
        let user = create_test_user(&app_data, "holder@example.com", "Passw0rd!", &[Permission::UsersView]).await;
        let role_id = role_ids_for_user(&app_data.db, user.id).await[0];

        let service = RoleService::new(app_data.clone());
        service.delete(role_id).await.unwrap();

        let resolved = app_data
            .permission_resolver
            .resolve(&app_data.db, user.id)
            .await
            .unwrap();
        assert!(resolved.is_empty());
        assert!(matches!(
            service.get(role_id).await.unwrap_err(),
            InternalError::Rbac(RbacError::RoleNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_add_and_remove_single_permission() {
        let app_data = setup_test_app_data().await;
        let view = ensure_permission(&app_data, Permission::UsersView).await;
        let service = RoleService::new(app_data);

        let role = service
            .create(NewRole {
                name: "Support".to_string(),
                description: None,
                permission_ids: vec![],
            })
            .await
            .unwrap()
            .role;

        service.add_permission(role.id, view.id).await.unwrap();
        assert_eq!(keys(&service.list_permissions(role.id).await.unwrap()), vec!["users.view"]);

        assert!(matches!(
            service.add_permission(role.id, view.id).await.unwrap_err(),
            InternalError::Rbac(RbacError::PermissionAlreadyAssigned { .. })
        ));
        assert!(matches!(
            service.add_permission(role.id, 999).await.unwrap_err(),
            InternalError::Rbac(RbacError::PermissionNotFound { .. })
        ));
        assert!(matches!(
            service.add_permission(999, view.id).await.unwrap_err(),
            InternalError::Rbac(RbacError::RoleNotFound { .. })
        ));

        service.remove_permission(role.id, view.id).await.unwrap();
        assert!(service.list_permissions(role.id).await.unwrap().is_empty());
        assert!(matches!(
            service.remove_permission(role.id, view.id).await.unwrap_err(),
            InternalError::Rbac(RbacError::PermissionNotAssigned { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_permissions_of_missing_role() {
        let app_data = setup_test_app_data().await;
        let service = RoleService::new(app_data);

        assert!(matches!(
            service.list_permissions(5).await.unwrap_err(),
            InternalError::Rbac(RbacError::RoleNotFound { role_id: 5 })
        ));
    }

    #[tokio::test]
    async fn test_role_ids_from_user_creation_survive_role_rename() {
        let app_data = setup_test_app_data().await;
        let roles = RoleService::new(app_data.clone());
        let users = UserService::new(app_data);

        let role = roles
            .create(NewRole {
                name: "Ops".to_string(),
                description: None,
                permission_ids: vec![],
            })
            .await
            .unwrap()
            .role;
        let user = users
            .create(NewUser {
                email: "ops@example.com".to_string(),
                password: "Passw0rd!".to_string(),
                is_active: true,
                role_ids: vec![role.id],
            })
            .await
            .unwrap();

        roles
            .update(
                role.id,
                RoleUpdate {
                    name: Some("Operations".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let reloaded = users.get(user.user.id).await.unwrap();
        assert_eq!(reloaded.roles[0].name, "Operations");
    }
}
