use poem_openapi::{OpenApi, Tags, param::Path, payload::Json};
use std::sync::Arc;

use crate::api::auth::BearerAuth;
use crate::app_data::AppData;
use crate::auth::PolicyGate;
use crate::errors::ApiError;
use crate::services::RoleService;
use crate::services::role_service::{NewRole, RoleUpdate, RoleWithPermissions};
use crate::types::dto::common::NoContentResponse;
use crate::types::dto::permission::PermissionResponse;
use crate::types::dto::role::{
    AddPermissionRequest, CreateRoleApiResponse, CreateRoleRequest, RoleResponse,
    UpdateRoleRequest,
};
use crate::types::internal::Permission;

#[derive(Tags)]
enum RoleTags {
    /// Role administration
    Roles,
}

/// Role administration endpoints
pub struct RoleApi {
    role_service: RoleService,
    gate: Arc<PolicyGate>,
}

impl RoleApi {
    pub fn new(app_data: Arc<AppData>, gate: Arc<PolicyGate>) -> Self {
        Self {
            role_service: RoleService::new(app_data),
            gate,
        }
    }
}

fn to_response(details: RoleWithPermissions) -> RoleResponse {
    RoleResponse::from_model(details.role, &details.permissions)
}

#[OpenApi]
impl RoleApi {
    /// List all roles with their permission keys
    #[oai(path = "/roles", method = "get", tag = "RoleTags::Roles")]
    async fn list_roles(&self, auth: BearerAuth) -> Result<Json<Vec<RoleResponse>>, ApiError> {
        self.gate.authorize(auth.token(), Permission::RolesView)?;

        let roles = self
            .role_service
            .list()
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(roles.into_iter().map(to_response).collect()))
    }

    /// Get a single role
    #[oai(path = "/roles/:id", method = "get", tag = "RoleTags::Roles")]
    async fn get_role(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<RoleResponse>, ApiError> {
        self.gate.authorize(auth.token(), Permission::RolesView)?;

        let role = self
            .role_service
            .get(id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(to_response(role)))
    }

    /// Create a role, optionally granting permissions
    #[oai(path = "/roles", method = "post", tag = "RoleTags::Roles")]
    async fn create_role(
        &self,
        auth: BearerAuth,
        body: Json<CreateRoleRequest>,
    ) -> Result<CreateRoleApiResponse, ApiError> {
        self.gate.authorize(auth.token(), Permission::RolesManage)?;
        let body = body.0;

        let created = self
            .role_service
            .create(NewRole {
                name: body.name,
                description: body.description,
                permission_ids: body.permission_ids,
            })
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(CreateRoleApiResponse::Created(Json(to_response(created))))
    }

    /// Partially update a role
    ///
    /// A present `permissionIds` list replaces the role's grants.
    #[oai(path = "/roles/:id", method = "put", tag = "RoleTags::Roles")]
    async fn update_role(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<UpdateRoleRequest>,
    ) -> Result<Json<RoleResponse>, ApiError> {
        self.gate.authorize(auth.token(), Permission::RolesManage)?;
        let body = body.0;

        let updated = self
            .role_service
            .update(
                id.0,
                RoleUpdate {
                    name: body.name,
                    description: body.description,
                    permission_ids: body.permission_ids,
                },
            )
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(to_response(updated)))
    }

    /// Delete a role with its assignments
    #[oai(path = "/roles/:id", method = "delete", tag = "RoleTags::Roles")]
    async fn delete_role(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<NoContentResponse, ApiError> {
        self.gate.authorize(auth.token(), Permission::RolesManage)?;

        self.role_service
            .delete(id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(NoContentResponse::NoContent)
    }

    /// Permissions granted by a role, ordered by key
    #[oai(path = "/roles/:id/permissions", method = "get", tag = "RoleTags::Roles")]
    async fn list_role_permissions(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<Vec<PermissionResponse>>, ApiError> {
        self.gate.authorize(auth.token(), Permission::RolesView)?;

        let permissions = self
            .role_service
            .list_permissions(id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(permissions.into_iter().map(PermissionResponse::from).collect()))
    }

    /// Grant one permission to a role
    #[oai(path = "/roles/:id/permissions", method = "post", tag = "RoleTags::Roles")]
    async fn add_role_permission(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<AddPermissionRequest>,
    ) -> Result<NoContentResponse, ApiError> {
        self.gate.authorize(auth.token(), Permission::RolesManage)?;

        self.role_service
            .add_permission(id.0, body.permission_id)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(NoContentResponse::NoContent)
    }

    /// Revoke one permission from a role
    #[oai(
        path = "/roles/:id/permissions/:permission_id",
        method = "delete",
        tag = "RoleTags::Roles"
    )]
    async fn remove_role_permission(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
        permission_id: Path<i32>,
    ) -> Result<NoContentResponse, ApiError> {
        self.gate.authorize(auth.token(), Permission::RolesManage)?;

        self.role_service
            .remove_permission(id.0, permission_id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(NoContentResponse::NoContent)
    }
}
