use std::sync::Arc;

use crate::app_data::AppData;
use crate::config::{begin_transaction, commit_transaction};
use crate::errors::InternalError;
use crate::errors::internal::RbacError;
use crate::services::input_validation::{non_blank, validate_email};
use crate::services::{CredentialHasher, PasswordValidator};
use crate::stores::UserStore;
use crate::stores::user_store::UserChanges;
use crate::types::db::{role, user};

/// A user together with the roles assigned to it
#[derive(Debug, Clone)]
pub struct UserWithRoles {
    pub user: user::Model,
    pub roles: Vec<role::Model>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub is_active: bool,
    pub role_ids: Vec<i32>,
}

/// Partial update; `None` (or a blank string) leaves a field unchanged and
/// `role_ids: Some(vec![])` clears every role
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
    pub role_ids: Option<Vec<i32>>,
}

/// CRUD over users and their role assignments
pub struct UserService {
    app_data: Arc<AppData>,
    user_store: Arc<UserStore>,
    credential_hasher: Arc<CredentialHasher>,
    password_validator: Arc<PasswordValidator>,
}

impl UserService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            user_store: app_data.user_store.clone(),
            credential_hasher: app_data.credential_hasher.clone(),
            password_validator: app_data.password_validator.clone(),
            app_data,
        }
    }

    pub async fn list(&self) -> Result<Vec<UserWithRoles>, InternalError> {
        let rows = self.user_store.list_with_roles(&self.app_data.db).await?;

        Ok(rows
            .into_iter()
            .map(|(user, roles)| UserWithRoles { user, roles })
            .collect())
    }

    pub async fn get(&self, user_id: i32) -> Result<UserWithRoles, InternalError> {
        let conn = &self.app_data.db;

        let user = self
            .user_store
            .find_by_id(conn, user_id)
            .await?
            .ok_or(RbacError::UserNotFound { user_id })?;
        let roles = self.user_store.roles_for_user(conn, &user).await?;

        Ok(UserWithRoles { user, roles })
    }

    /// Create a user with the given roles in one transaction
    ///
    /// # Errors
    /// * `ValidationError` - malformed email or password outside the policy
    /// * `RbacError::DuplicateEmail` - email already taken
    pub async fn create(&self, new_user: NewUser) -> Result<UserWithRoles, InternalError> {
        validate_email(&new_user.email)?;
        self.password_validator.validate(&new_user.password)?;

        let password_hash = self.credential_hasher.hash(&new_user.password)?;

        let txn = begin_transaction(&self.app_data.db).await?;

        if self
            .user_store
            .find_by_email(&txn, &new_user.email)
            .await?
            .is_some()
        {
            return Err(RbacError::DuplicateEmail {
                email: new_user.email,
            }
            .into());
        }

        let user = self
            .user_store
            .insert(&txn, &new_user.email, password_hash, new_user.is_active)
            .await?;

        if !new_user.role_ids.is_empty() {
            self.user_store
                .replace_roles(&txn, user.id, &new_user.role_ids)
                .await?;
        }

        let roles = self.user_store.roles_for_user(&txn, &user).await?;
        commit_transaction(txn).await?;

        tracing::info!(user_id = user.id, "Created user with {} role(s)", roles.len());

        Ok(UserWithRoles { user, roles })
    }

    /// Apply a partial update in one transaction
    ///
    /// # Errors
    /// * `RbacError::UserNotFound` - no such user
    /// * `RbacError::DuplicateEmail` - new email belongs to another user
    pub async fn update(
        &self,
        user_id: i32,
        update: UserUpdate,
    ) -> Result<UserWithRoles, InternalError> {
        let email = non_blank(update.email);
        let password = non_blank(update.password);

        if let Some(email) = &email {
            validate_email(email)?;
        }
        let password_hash = match &password {
            Some(password) => {
                self.password_validator.validate(password)?;
                Some(self.credential_hasher.hash(password)?)
            }
            None => None,
        };

        let txn = begin_transaction(&self.app_data.db).await?;

        let existing = self
            .user_store
            .find_by_id(&txn, user_id)
            .await?
            .ok_or(RbacError::UserNotFound { user_id })?;

        let email = email.filter(|e| *e != existing.email);
        if let Some(email) = &email {
            if self.user_store.find_by_email(&txn, email).await?.is_some() {
                return Err(RbacError::DuplicateEmail {
                    email: email.clone(),
                }
                .into());
            }
        }

        let user = self
            .user_store
            .update(
                &txn,
                existing,
                UserChanges {
                    email,
                    password_hash,
                    is_active: update.is_active,
                },
            )
            .await?;

        if let Some(role_ids) = &update.role_ids {
            self.user_store.replace_roles(&txn, user.id, role_ids).await?;
        }

        let roles = self.user_store.roles_for_user(&txn, &user).await?;
        commit_transaction(txn).await?;

        tracing::info!(user_id = user.id, "Updated user");

        Ok(UserWithRoles { user, roles })
    }

    /// Delete a user and its role assignments
    pub async fn delete(&self, user_id: i32) -> Result<(), InternalError> {
        let txn = begin_transaction(&self.app_data.db).await?;

        if !self.user_store.delete(&txn, user_id).await? {
            return Err(RbacError::UserNotFound { user_id }.into());
        }

        commit_transaction(txn).await?;
        tracing::info!(user_id, "Deleted user");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::ValidationError;
    use crate::test::utils::{create_test_role, role_ids_for_user, setup_test_app_data};

    fn new_user(email: &str, role_ids: Vec<i32>) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: "Passw0rd!".to_string(),
            is_active: true,
            role_ids,
        }
    }

    #[tokio::test]
    async fn test_create_user_with_roles_ignores_unknown_ids() {
        let app_data = setup_test_app_data().await;
        let role = create_test_role(&app_data, "Viewer", &[]).await;
        let service = UserService::new(app_data);

        let created = service
            .create(new_user("new@example.com", vec![role.id, 999]))
            .await
            .unwrap();

        assert_eq!(created.user.email, "new@example.com");
        assert_ne!(created.user.password_hash, "Passw0rd!");
        assert_eq!(created.roles.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(), vec!["Viewer"]);
    }

    #[tokio::test]
    async fn test_create_duplicate_email_leaves_existing_row() {
        let app_data = setup_test_app_data().await;
        let service = UserService::new(app_data.clone());

        let original = service.create(new_user("dup@example.com", vec![])).await.unwrap();
        let err = service
            .create(NewUser {
                is_active: false,
                ..new_user("dup@example.com", vec![])
            })
            .await
            .unwrap_err();

        assert!(matches!(err, InternalError::Rbac(RbacError::DuplicateEmail { .. })));

        let all = service.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].user, original.user);
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let app_data = setup_test_app_data().await;
        let service = UserService::new(app_data);

        let bad_email = service.create(new_user("not-an-email", vec![])).await.unwrap_err();
        assert!(matches!(bad_email, InternalError::Validation(ValidationError::InvalidEmail { .. })));

        let weak = service
            .create(NewUser {
                password: "password".to_string(),
                ..new_user("weak@example.com", vec![])
            })
            .await
            .unwrap_err();
        assert!(matches!(weak, InternalError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_role_list_semantics() {
        let app_data = setup_test_app_data().await;
        let viewer = create_test_role(&app_data, "Viewer", &[]).await;
        let editor = create_test_role(&app_data, "Editor", &[]).await;
        let service = UserService::new(app_data);

        let created = service
            .create(new_user("roles@example.com", vec![viewer.id]))
            .await
            .unwrap();

        let untouched = service
            .update(
                created.user.id,
                UserUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(untouched.roles.len(), 1);
        assert!(!untouched.user.is_active);

        let replaced = service
            .update(
                created.user.id,
                UserUpdate {
                    role_ids: Some(vec![editor.id]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(replaced.roles[0].name, "Editor");

        let cleared = service
            .update(
                created.user.id,
                UserUpdate {
                    role_ids: Some(vec![]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(cleared.roles.is_empty());
    }

    #[tokio::test]
    async fn test_update_blank_fields_are_ignored() {
        let app_data = setup_test_app_data().await;
        let service = UserService::new(app_data);

        let created = service.create(new_user("keep@example.com", vec![])).await.unwrap();
        let updated = service
            .update(
                created.user.id,
                UserUpdate {
                    email: Some(String::new()),
                    password: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.user.email, "keep@example.com");
        assert_eq!(updated.user.password_hash, created.user.password_hash);
    }

    #[tokio::test]
    async fn test_update_email_conflict() {
        let app_data = setup_test_app_data().await;
        let service = UserService::new(app_data);

        service.create(new_user("taken@example.com", vec![])).await.unwrap();
        let other = service.create(new_user("other@example.com", vec![])).await.unwrap();

        let err = service
            .update(
                other.user.id,
                UserUpdate {
                    email: Some("taken@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, InternalError::Rbac(RbacError::DuplicateEmail { .. })));

        // Re-submitting the user's own email is not a conflict
        assert!(service
            .update(
                other.user.id,
                UserUpdate {
                    email: Some("other@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let app_data = setup_test_app_data().await;
        let service = UserService::new(app_data);

        assert!(matches!(
            service.get(77).await.unwrap_err(),
            InternalError::Rbac(RbacError::UserNotFound { user_id: 77 })
        ));
        assert!(matches!(
            service.update(77, UserUpdate::default()).await.unwrap_err(),
            InternalError::Rbac(RbacError::UserNotFound { .. })
        ));
        assert!(matches!(
            service.delete(77).await.unwrap_err(),
            InternalError::Rbac(RbacError::UserNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_user() {
        let app_data = setup_test_app_data().await;
        let role = create_test_role(&app_data, "Viewer", &[]).await;
        let service = UserService::new(app_data.clone());

        let created = service.create(new_user("bye@example.com", vec![role.id])).await.unwrap();
        service.delete(created.user.id).await.unwrap();

        assert!(service.list().await.unwrap().is_empty());
        assert!(role_ids_for_user(&app_data.db, created.user.id).await.is_empty());
    }
}
