use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::services::input_validation::require_non_blank;
use crate::services::{CredentialHasher, PermissionResolver, TokenService};
use crate::stores::UserStore;
use crate::types::db::{role, user};
use crate::types::internal::PermissionSet;
use crate::types::internal::auth::Claims;

/// Result of a successful login
#[derive(Debug)]
pub struct LoginOutcome {
    pub token: String,
    pub claims: Claims,
    pub user: user::Model,
}

/// Current identity as seen by `/auth/me`
#[derive(Debug)]
pub struct Identity {
    pub user: user::Model,
    pub roles: Vec<role::Model>,
    pub permissions: PermissionSet,
}

/// Authentication service: credential check, permission resolution, token issuance
pub struct AuthService {
    app_data: Arc<AppData>,
    user_store: Arc<UserStore>,
    credential_hasher: Arc<CredentialHasher>,
    permission_resolver: Arc<PermissionResolver>,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            user_store: app_data.user_store.clone(),
            credential_hasher: app_data.credential_hasher.clone(),
            permission_resolver: app_data.permission_resolver.clone(),
            token_service: app_data.token_service.clone(),
            app_data,
        }
    }

    /// Verify credentials and issue a token carrying the user's effective permissions
    ///
    /// Unknown email, wrong password and inactive account all yield
    /// `CredentialError::InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, InternalError> {
        require_non_blank(email, "email")?;
        require_non_blank(password, "password")?;

        let conn = &self.app_data.db;

        let user = match self.user_store.find_by_email(conn, email).await? {
            Some(user) => user,
            None => {
                tracing::debug!("Login rejected: unknown email");
                return Err(CredentialError::InvalidCredentials.into());
            }
        };

        if !self.credential_hasher.verify(password, &user.password_hash)? {
            tracing::debug!("Login rejected: wrong password for user {}", user.id);
            return Err(CredentialError::InvalidCredentials.into());
        }

        if !user.is_active {
            tracing::debug!("Login rejected: user {} is inactive", user.id);
            return Err(CredentialError::InvalidCredentials.into());
        }

        let permissions = self.permission_resolver.resolve(conn, user.id).await?;
        let (token, claims) = self.token_service.issue(user.id, &user.email, &permissions)?;

        tracing::info!(
            user_id = user.id,
            jti = %claims.jti,
            "Issued access token with {} permission(s)",
            permissions.len()
        );

        Ok(LoginOutcome {
            token,
            claims,
            user,
        })
    }

    /// Look up the caller's live record, roles and current permissions
    pub async fn me(&self, claims: &Claims) -> Result<Identity, InternalError> {
        let conn = &self.app_data.db;
        let user_id = claims.user_id()?;

        let user = self
            .user_store
            .find_by_id(conn, user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or(CredentialError::ActiveUserNotFound { user_id })?;

        let roles = self.user_store.roles_for_user(conn, &user).await?;
        let permissions = self.permission_resolver.resolve(conn, user.id).await?;

        Ok(Identity {
            user,
            roles,
            permissions,
        })
    }
}
