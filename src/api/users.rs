use poem_openapi::{OpenApi, Tags, param::Path, payload::Json};
use std::sync::Arc;

use crate::api::auth::BearerAuth;
use crate::app_data::AppData;
use crate::auth::PolicyGate;
use crate::errors::ApiError;
use crate::services::UserService;
use crate::services::user_service::{NewUser, UserUpdate, UserWithRoles};
use crate::types::dto::common::NoContentResponse;
use crate::types::dto::user::{
    CreateUserApiResponse, CreateUserRequest, UpdateUserRequest, UserResponse,
};
use crate::types::internal::Permission;

#[derive(Tags)]
enum UserTags {
    /// User administration
    Users,
}

/// User administration endpoints
pub struct UserApi {
    user_service: UserService,
    gate: Arc<PolicyGate>,
}

impl UserApi {
    pub fn new(app_data: Arc<AppData>, gate: Arc<PolicyGate>) -> Self {
        Self {
            user_service: UserService::new(app_data),
            gate,
        }
    }
}

fn to_response(details: UserWithRoles) -> UserResponse {
    UserResponse::from_model(details.user, &details.roles)
}

#[OpenApi]
impl UserApi {
    /// List all users with their role names
    #[oai(path = "/users", method = "get", tag = "UserTags::Users")]
    async fn list_users(&self, auth: BearerAuth) -> Result<Json<Vec<UserResponse>>, ApiError> {
        self.gate.authorize(auth.token(), Permission::UsersView)?;

        let users = self
            .user_service
            .list()
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(users.into_iter().map(to_response).collect()))
    }

    /// Get a single user
    #[oai(path = "/users/:id", method = "get", tag = "UserTags::Users")]
    async fn get_user(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<UserResponse>, ApiError> {
        self.gate.authorize(auth.token(), Permission::UsersView)?;

        let user = self
            .user_service
            .get(id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(to_response(user)))
    }

    /// Create a user, optionally assigning roles
    #[oai(path = "/users", method = "post", tag = "UserTags::Users")]
    async fn create_user(
        &self,
        auth: BearerAuth,
        body: Json<CreateUserRequest>,
    ) -> Result<CreateUserApiResponse, ApiError> {
        let claims = self.gate.authorize(auth.token(), Permission::UsersCreate)?;
        let body = body.0;

        let created = self
            .user_service
            .create(NewUser {
                email: body.email,
                password: body.password,
                is_active: body.is_active,
                role_ids: body.role_ids,
            })
            .await
            .map_err(ApiError::from_internal_error)?;

        tracing::debug!(actor = %claims.sub, user_id = created.user.id, "User created via API");

        Ok(CreateUserApiResponse::Created(Json(to_response(created))))
    }

    /// Partially update a user
    ///
    /// A present `roleIds` list replaces the user's roles; blank strings are ignored.
    #[oai(path = "/users/:id", method = "put", tag = "UserTags::Users")]
    async fn update_user(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<UpdateUserRequest>,
    ) -> Result<Json<UserResponse>, ApiError> {
        self.gate.authorize(auth.token(), Permission::UsersEdit)?;
        let body = body.0;

        let updated = self
            .user_service
            .update(
                id.0,
                UserUpdate {
                    email: body.email,
                    password: body.password,
                    is_active: body.is_active,
                    role_ids: body.role_ids,
                },
            )
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(to_response(updated)))
    }

    /// Delete a user and its role assignments
    #[oai(path = "/users/:id", method = "delete", tag = "UserTags::Users")]
    async fn delete_user(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<NoContentResponse, ApiError> {
        self.gate.authorize(auth.token(), Permission::UsersDelete)?;

        self.user_service
            .delete(id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(NoContentResponse::NoContent)
    }
}
