use poem_openapi::{OpenApi, SecurityScheme, Tags, auth::Bearer, payload::Json};
use std::sync::Arc;

use crate::app_data::AppData;
use crate::auth::PolicyGate;
use crate::errors::ApiError;
use crate::services::AuthService;
use crate::types::dto::auth::{LoginRequest, LoginResponse, MeResponse};

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(pub Bearer);

impl BearerAuth {
    pub fn token(&self) -> &str {
        &self.0.token
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

/// Authentication API endpoints
pub struct AuthApi {
    auth_service: AuthService,
    gate: Arc<PolicyGate>,
}

impl AuthApi {
    pub fn new(app_data: Arc<AppData>, gate: Arc<PolicyGate>) -> Self {
        Self {
            auth_service: AuthService::new(app_data),
            gate,
        }
    }
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Login with email and password to receive a bearer token
    ///
    /// The token embeds the user's effective permissions at issuance time.
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, body: Json<LoginRequest>) -> Result<Json<LoginResponse>, ApiError> {
        let outcome = self
            .auth_service
            .login(&body.email, &body.password)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(LoginResponse {
            token: outcome.token,
            user_id: outcome.user.id,
            email: outcome.user.email,
            permissions: outcome.claims.permissions,
        }))
    }

    /// Current user with roles and live permissions
    #[oai(path = "/me", method = "get", tag = "AuthTags::Authentication")]
    async fn me(&self, auth: BearerAuth) -> Result<Json<MeResponse>, ApiError> {
        let claims = self.gate.authenticate(auth.token())?;

        let identity = self
            .auth_service
            .me(&claims)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(MeResponse {
            id: identity.user.id,
            email: identity.user.email,
            is_active: identity.user.is_active,
            roles: identity.roles.into_iter().map(|r| r.name).collect(),
            permissions: identity.permissions.to_vec(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{create_test_user, setup_test_app_data};
    use crate::types::internal::Permission;

    async fn setup() -> (Arc<AppData>, AuthApi) {
        let app_data = setup_test_app_data().await;
        let gate = Arc::new(PolicyGate::new(app_data.token_service.clone()));
        let api = AuthApi::new(app_data.clone(), gate);
        (app_data, api)
    }

    fn bearer(token: &str) -> BearerAuth {
        BearerAuth(Bearer {
            token: token.to_string(),
        })
    }

    #[tokio::test]
    async fn test_login_with_valid_credentials() {
        let (app_data, api) = setup().await;
        let user = create_test_user(&app_data, "ok@example.com", "Passw0rd!", &[Permission::UsersView]).await;

        let response = api
            .login(Json(LoginRequest {
                email: "ok@example.com".to_string(),
                password: "Passw0rd!".to_string(),
            }))
            .await
            .unwrap();

        assert!(!response.token.is_empty());
        assert_eq!(response.user_id, user.id);
        assert_eq!(response.permissions, vec!["users.view"]);
    }

    #[tokio::test]
    async fn test_login_with_invalid_credentials() {
        let (_app_data, api) = setup().await;

        let result = api
            .login(Json(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "Passw0rd!".to_string(),
            }))
            .await;

        match result {
            Err(ApiError::Unauthorized(body)) => {
                assert_eq!(body.0.error, "invalid_credentials");
                assert_eq!(body.0.status_code, 401);
            }
            other => panic!("expected 401, got {:?}", other.map(|r| r.0.token)),
        }
    }

    #[tokio::test]
    async fn test_login_with_blank_fields_is_bad_request() {
        let (_app_data, api) = setup().await;

        let result = api
            .login(Json(LoginRequest {
                email: "".to_string(),
                password: "".to_string(),
            }))
            .await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_me_with_valid_token() {
        let (app_data, api) = setup().await;
        create_test_user(&app_data, "me@example.com", "Passw0rd!", &[Permission::DashboardAccess]).await;

        let login = api
            .login(Json(LoginRequest {
                email: "me@example.com".to_string(),
                password: "Passw0rd!".to_string(),
            }))
            .await
            .unwrap();

        let me = api.me(bearer(&login.token)).await.unwrap();
        assert_eq!(me.email, "me@example.com");
        assert!(me.is_active);
        assert_eq!(me.permissions, vec!["dashboard.access"]);
    }

    #[tokio::test]
    async fn test_me_with_invalid_token() {
        let (_app_data, api) = setup().await;

        let result = api.me(bearer("invalid.jwt.token")).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_me_for_deleted_user_is_not_found() {
        let (app_data, api) = setup().await;
        let user = create_test_user(&app_data, "gone@example.com", "Passw0rd!", &[]).await;

        let login = api
            .login(Json(LoginRequest {
                email: "gone@example.com".to_string(),
                password: "Passw0rd!".to_string(),
            }))
            .await
            .unwrap();
        app_data.user_store.delete(&app_data.db, user.id).await.unwrap();

        let result = api.me(bearer(&login.token)).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
