// Common test utilities for integration tests
#![allow(dead_code)]

use gatekeeper_backend::AppData;
use gatekeeper_backend::config::{
    JwtSettings, SecretManager, ServerSettings, connect_database, migrate_database,
};
use gatekeeper_backend::types::internal::Permission;
use std::sync::{Arc, Mutex};

pub const TEST_JWT_SECRET: &str = "integration-secret-key-with-32-characters";
pub const TEST_PEPPER: &str = "integration-pepper-16";

/// Creates AppData over a fresh in-memory database with migrations applied
pub async fn setup_test_app_data() -> Arc<AppData> {
    let db = connect_database("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    migrate_database(&db)
        .await
        .expect("Failed to run migrations");

    let secret_manager =
        SecretManager::from_secrets(TEST_JWT_SECRET, TEST_PEPPER).expect("valid test secrets");

    Arc::new(AppData::new(
        db,
        JwtSettings::new("gatekeeper", "gatekeeper-clients", 30),
        secret_manager,
    ))
}

pub fn test_server_settings() -> ServerSettings {
    ServerSettings {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 3000,
        cors_allowed_origins: vec!["http://localhost:3000".to_string()],
    }
}

/// Inserts the catalog row for `permission` and returns its id
pub async fn seed_permission(app_data: &AppData, permission: Permission) -> i32 {
    app_data
        .permission_store
        .insert(
            &app_data.db,
            permission.key(),
            Some(permission.description().to_string()),
        )
        .await
        .expect("Failed to insert permission")
        .id
}

/// Creates a role with the given permission ids
pub async fn create_role(app_data: &AppData, name: &str, permission_ids: &[i32]) -> i32 {
    let role = app_data
        .role_store
        .insert(&app_data.db, name, None)
        .await
        .expect("Failed to create role");
    app_data
        .role_store
        .replace_permissions(&app_data.db, role.id, permission_ids)
        .await
        .expect("Failed to grant permissions");
    role.id
}

/// Creates an active user holding the given roles
pub async fn create_user(app_data: &AppData, email: &str, password: &str, role_ids: &[i32]) -> i32 {
    let hash = app_data
        .credential_hasher
        .hash(password)
        .expect("Failed to hash password");
    let user = app_data
        .user_store
        .insert(&app_data.db, email, hash, true)
        .await
        .expect("Failed to create user");
    app_data
        .user_store
        .replace_roles(&app_data.db, user.id, role_ids)
        .await
        .expect("Failed to assign roles");
    user.id
}

/// Helper to manage environment variables in tests
///
/// Cleans up specified environment variables on creation and drop.
pub struct EnvGuard {
    vars: Vec<String>,
}

impl EnvGuard {
    pub fn new(vars: Vec<&str>) -> Self {
        for var in &vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
        Self {
            vars: vars.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in &self.vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }
}

/// Global mutex for tests that modify environment variables
pub static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());
