use std::sync::Arc;

use crate::app_data::AppData;
use crate::config::{SeedSettings, begin_transaction, commit_transaction};
use crate::errors::InternalError;
use crate::services::crypto::generate_secure_password;
use crate::services::input_validation::validate_email;
use crate::types::internal::Permission;

pub const ADMIN_ROLE_NAME: &str = "Admin";
pub const USER_ROLE_NAME: &str = "User";

/// What a seeding run changed
#[derive(Debug, Default)]
pub struct SeedReport {
    pub permissions_created: usize,
    pub roles_created: usize,
    pub admin: Option<SeededAdmin>,
}

/// Initial admin account created by this run
#[derive(Debug)]
pub struct SeededAdmin {
    pub email: String,
    /// Present only when the password was generated rather than configured
    pub generated_password: Option<String>,
}

/// Idempotent startup seed
///
/// Each stage is gated by its own existence check:
/// 1. Every catalog permission missing by key is inserted
/// 2. Default `Admin` (all permissions) and `User` roles, only when no role exists
/// 3. The initial admin user holding `Admin`, only when no user exists
pub struct Seeder {
    app_data: Arc<AppData>,
    settings: SeedSettings,
}

impl Seeder {
    pub fn new(app_data: Arc<AppData>, settings: SeedSettings) -> Self {
        Self { app_data, settings }
    }

    pub async fn seed(&self) -> Result<SeedReport, InternalError> {
        let mut report = SeedReport {
            permissions_created: self.seed_permissions().await?,
            ..Default::default()
        };
        report.roles_created = self.seed_roles().await?;
        report.admin = self.seed_admin().await?;

        tracing::info!(
            permissions_created = report.permissions_created,
            roles_created = report.roles_created,
            admin_created = report.admin.is_some(),
            "Seeding complete"
        );

        Ok(report)
    }

    async fn seed_permissions(&self) -> Result<usize, InternalError> {
        let store = &self.app_data.permission_store;
        let txn = begin_transaction(&self.app_data.db).await?;
        let mut created = 0;

        for permission in Permission::ALL {
            if store.find_by_key(&txn, permission.key()).await?.is_none() {
                store
                    .insert(&txn, permission.key(), Some(permission.description().to_string()))
                    .await?;
                tracing::debug!("Seeded permission {}", permission);
                created += 1;
            }
        }

        commit_transaction(txn).await?;
        Ok(created)
    }

    async fn seed_roles(&self) -> Result<usize, InternalError> {
        let roles = &self.app_data.role_store;
        let txn = begin_transaction(&self.app_data.db).await?;

        if roles.count(&txn).await? > 0 {
            tracing::debug!("Roles already present, skipping default roles");
            return Ok(0);
        }

        let admin = roles
            .insert(&txn, ADMIN_ROLE_NAME, Some("Full system access".to_string()))
            .await?;
        roles
            .insert(&txn, USER_ROLE_NAME, Some("Basic user access".to_string()))
            .await?;

        let all_ids: Vec<i32> = self
            .app_data
            .permission_store
            .list(&txn)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        roles.replace_permissions(&txn, admin.id, &all_ids).await?;

        commit_transaction(txn).await?;
        Ok(2)
    }

    async fn seed_admin(&self) -> Result<Option<SeededAdmin>, InternalError> {
        let users = &self.app_data.user_store;
        let txn = begin_transaction(&self.app_data.db).await?;

        if users.count(&txn).await? > 0 {
            tracing::debug!("Users already present, skipping admin account");
            return Ok(None);
        }

        let Some(admin_role) = self
            .app_data
            .role_store
            .find_by_name(&txn, ADMIN_ROLE_NAME)
            .await?
        else {
            tracing::warn!("No '{}' role found, skipping admin account", ADMIN_ROLE_NAME);
            return Ok(None);
        };

        validate_email(&self.settings.admin_email)?;

        let (password, generated_password) = match &self.settings.admin_password {
            Some(password) => {
                self.app_data.password_validator.validate(password)?;
                (password.clone(), None)
            }
            None => {
                let password = generate_secure_password();
                (password.clone(), Some(password))
            }
        };

        let password_hash = self.app_data.credential_hasher.hash(&password)?;
        let admin = users
            .insert(&txn, &self.settings.admin_email, password_hash, true)
            .await?;
        users.replace_roles(&txn, admin.id, &[admin_role.id]).await?;

        commit_transaction(txn).await?;
        tracing::info!(user_id = admin.id, "Created initial admin account {}", admin.email);

        Ok(Some(SeededAdmin {
            email: admin.email,
            generated_password,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::AuthService;
    use crate::test::utils::setup_test_app_data;

    fn settings(password: Option<&str>) -> SeedSettings {
        SeedSettings {
            admin_email: "admin@gatekeeperhq.com".to_string(),
            admin_password: password.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_first_run_creates_catalog_roles_and_admin() {
        let app_data = setup_test_app_data().await;
        let report = Seeder::new(app_data.clone(), settings(None)).seed().await.unwrap();

        assert_eq!(report.permissions_created, Permission::ALL.len());
        assert_eq!(report.roles_created, 2);

        let admin = report.admin.expect("admin should be created");
        let password = admin.generated_password.expect("password should be generated");

        let outcome = AuthService::new(app_data)
            .login(&admin.email, &password)
            .await
            .unwrap();
        assert_eq!(outcome.claims.permissions.len(), Permission::ALL.len());
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let app_data = setup_test_app_data().await;
        let seeder = Seeder::new(app_data.clone(), settings(Some("Adm1n$ecret")));

        seeder.seed().await.unwrap();
        let second = seeder.seed().await.unwrap();

        assert_eq!(second.permissions_created, 0);
        assert_eq!(second.roles_created, 0);
        assert!(second.admin.is_none());
        assert_eq!(
            app_data.permission_store.count(&app_data.db).await.unwrap(),
            Permission::ALL.len() as u64
        );
        assert_eq!(app_data.user_store.count(&app_data.db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_configured_admin_password_is_used() {
        let app_data = setup_test_app_data().await;
        let report = Seeder::new(app_data.clone(), settings(Some("Adm1n$ecret")))
            .seed()
            .await
            .unwrap();

        assert!(report.admin.unwrap().generated_password.is_none());
        assert!(AuthService::new(app_data)
            .login("admin@gatekeeperhq.com", "Adm1n$ecret")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_missing_catalog_entry_is_backfilled() {
        let app_data = setup_test_app_data().await;
        app_data
            .permission_store
            .insert(&app_data.db, "users.view", Some("View users list and details".to_string()))
            .await
            .unwrap();

        let report = Seeder::new(app_data, settings(None)).seed().await.unwrap();
        assert_eq!(report.permissions_created, Permission::ALL.len() - 1);
    }
}
