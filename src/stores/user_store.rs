use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::errors::internal::RbacError;
use crate::stores::is_unique_violation;
use crate::types::db::{role, user, user_role};

/// Fields for a partial user update; `None` leaves the column untouched
#[derive(Debug, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub is_active: Option<bool>,
}

/// Data access for `users` and `user_roles`
///
/// Stateless: every method takes the connection or transaction to run on.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserStore;

impl UserStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find_by_id(user_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    /// Exact, case-sensitive email lookup
    pub async fn find_by_email(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))
    }

    /// All users with their roles, ordered by id
    pub async fn list_with_roles(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<(user::Model, Vec<role::Model>)>, InternalError> {
        user::Entity::find()
            .order_by_asc(user::Column::Id)
            .find_with_related(role::Entity)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_users_with_roles", e))
    }

    pub async fn roles_for_user(
        &self,
        conn: &impl ConnectionTrait,
        user: &user::Model,
    ) -> Result<Vec<role::Model>, InternalError> {
        user.find_related(role::Entity)
            .order_by_asc(role::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_roles_for_user", e))
    }

    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
        password_hash: String,
        is_active: bool,
    ) -> Result<user::Model, InternalError> {
        let now = Utc::now().timestamp();

        let new_user = user::ActiveModel {
            email: Set(email.to_string()),
            password_hash: Set(password_hash),
            is_active: Set(is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        new_user.insert(conn).await.map_err(|e| {
            if is_unique_violation(&e) {
                InternalError::Rbac(RbacError::DuplicateEmail {
                    email: email.to_string(),
                })
            } else {
                InternalError::database("insert_user", e)
            }
        })
    }

    /// Apply a partial update and bump `updated_at`
    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        existing: user::Model,
        changes: UserChanges,
    ) -> Result<user::Model, InternalError> {
        let mut active: user::ActiveModel = existing.into();

        if let Some(email) = &changes.email {
            active.email = Set(email.clone());
        }
        if let Some(password_hash) = changes.password_hash {
            active.password_hash = Set(password_hash);
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().timestamp());

        active.update(conn).await.map_err(|e| {
            if is_unique_violation(&e) {
                InternalError::Rbac(RbacError::DuplicateEmail {
                    email: changes.email.clone().unwrap_or_default(),
                })
            } else {
                InternalError::database("update_user", e)
            }
        })
    }

    /// Delete a user and its role assignments; returns false when no row existed
    pub async fn delete(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<bool, InternalError> {
        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_user_roles", e))?;

        let result = user::Entity::delete_by_id(user_id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_user", e))?;

        Ok(result.rows_affected > 0)
    }

    /// Replace the user's role set; ids that do not name an existing role are skipped
    pub async fn replace_roles(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
        role_ids: &[i32],
    ) -> Result<(), InternalError> {
        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("clear_user_roles", e))?;

        if role_ids.is_empty() {
            return Ok(());
        }

        let existing = role::Entity::find()
            .filter(role::Column::Id.is_in(role_ids.iter().copied()))
            .order_by_asc(role::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_roles_by_ids", e))?;

        if existing.is_empty() {
            return Ok(());
        }

        let rows = existing.into_iter().map(|r| user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(r.id),
        });

        user_role::Entity::insert_many(rows)
            .exec_without_returning(conn)
            .await
            .map_err(|e| InternalError::database("insert_user_roles", e))?;

        Ok(())
    }

    pub async fn count(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        user::Entity::find()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_users", e))
    }
}
