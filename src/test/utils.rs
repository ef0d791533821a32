// Test utilities shared across unit tests
// Only compiled when running tests

use migration::{Migrator, MigratorTrait};
use sea_orm::{ColumnTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait, QueryFilter};
use std::sync::Arc;

use crate::app_data::AppData;
use crate::config::{JwtSettings, SecretManager};
use crate::types::db::{permission, role, user, user_role};
use crate::types::internal::Permission;

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_PEPPER: &str = "test-pepper-for-unit-tests";

/// Creates an in-memory database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Creates AppData over a fresh in-memory database with test secrets
pub async fn setup_test_app_data() -> Arc<AppData> {
    let db = setup_test_db().await;
    let secret_manager =
        SecretManager::from_secrets(TEST_JWT_SECRET, TEST_PEPPER).expect("valid test secrets");

    Arc::new(AppData::new(
        db,
        JwtSettings::new("gatekeeper", "gatekeeper-clients", 30),
        secret_manager,
    ))
}

/// Returns the catalog row for `permission`, inserting it when missing
pub async fn ensure_permission(app_data: &AppData, permission: Permission) -> permission::Model {
    let store = &app_data.permission_store;

    if let Some(existing) = store
        .find_by_key(&app_data.db, permission.key())
        .await
        .expect("Failed to look up permission")
    {
        return existing;
    }

    store
        .insert(
            &app_data.db,
            permission.key(),
            Some(permission.description().to_string()),
        )
        .await
        .expect("Failed to insert permission")
}

/// Creates a role granting exactly `permissions`
pub async fn create_test_role(
    app_data: &AppData,
    name: &str,
    permissions: &[Permission],
) -> role::Model {
    let mut permission_ids = Vec::new();
    for permission in permissions {
        permission_ids.push(ensure_permission(app_data, *permission).await.id);
    }

    let role = app_data
        .role_store
        .insert(&app_data.db, name, None)
        .await
        .expect("Failed to create test role");

    app_data
        .role_store
        .replace_permissions(&app_data.db, role.id, &permission_ids)
        .await
        .expect("Failed to grant test permissions");

    role
}

/// Creates an active user holding one role with exactly `permissions`
pub async fn create_test_user(
    app_data: &AppData,
    email: &str,
    password: &str,
    permissions: &[Permission],
) -> user::Model {
    let role = create_test_role(app_data, &format!("role-for-{}", email), permissions).await;

    let password_hash = app_data
        .credential_hasher
        .hash(password)
        .expect("Failed to hash test password");

    let user = app_data
        .user_store
        .insert(&app_data.db, email, password_hash, true)
        .await
        .expect("Failed to create test user");

    app_data
        .user_store
        .replace_roles(&app_data.db, user.id, &[role.id])
        .await
        .expect("Failed to assign test role");

    user
}

/// Role ids currently assigned to a user
pub async fn role_ids_for_user(conn: &impl ConnectionTrait, user_id: i32) -> Vec<i32> {
    user_role::Entity::find()
        .filter(user_role::Column::UserId.eq(user_id))
        .all(conn)
        .await
        .expect("Failed to load user roles")
        .into_iter()
        .map(|r| r.role_id)
        .collect()
}
