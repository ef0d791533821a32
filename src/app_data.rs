use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::{JwtSettings, SecretManager};
use crate::services::{CredentialHasher, PasswordValidator, PermissionResolver, TokenService};
use crate::stores::{PermissionStore, RoleStore, UserStore};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once at startup and shared with every service.
///
/// ```text
/// main.rs
///   ↓
/// AppData::new(db, jwt_settings, secret_manager)
///   ↓ creates once
///   ├─ db (DatabaseConnection)
///   ├─ token_service / credential_hasher / password_validator
///   ├─ user_store / role_store / permission_store
///   └─ permission_resolver
///   ↓ wrapped in Arc<AppData>
///   ├─ AuthService::new(app_data)
///   ├─ UserService::new(app_data)
///   ├─ RoleService::new(app_data)
///   └─ PermissionService::new(app_data)
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub secret_manager: Arc<SecretManager>,
    pub token_service: Arc<TokenService>,
    pub credential_hasher: Arc<CredentialHasher>,
    pub password_validator: Arc<PasswordValidator>,
    pub user_store: Arc<UserStore>,
    pub role_store: Arc<RoleStore>,
    pub permission_store: Arc<PermissionStore>,
    pub permission_resolver: Arc<PermissionResolver>,
}

impl AppData {
    /// Build application data on a connected and migrated database
    pub fn new(
        db: DatabaseConnection,
        jwt_settings: JwtSettings,
        secret_manager: SecretManager,
    ) -> Self {
        tracing::info!("Initializing AppData...");
        let secret_manager = Arc::new(secret_manager);

        let token_service = Arc::new(TokenService::new(
            secret_manager.jwt_secret(),
            jwt_settings,
        ));
        tracing::debug!("Token service ready: {}", token_service);

        let credential_hasher = Arc::new(CredentialHasher::new(secret_manager.pepper()));
        let password_validator = Arc::new(PasswordValidator::new());

        let user_store = Arc::new(UserStore::new());
        let role_store = Arc::new(RoleStore::new());
        let permission_store = Arc::new(PermissionStore::new());

        let permission_resolver = Arc::new(PermissionResolver::new(
            user_store.clone(),
            permission_store.clone(),
        ));

        tracing::info!("AppData initialization complete");

        Self {
            db,
            secret_manager,
            token_service,
            credential_hasher,
            password_validator,
            user_store,
            role_store,
            permission_store,
            permission_resolver,
        }
    }
}
