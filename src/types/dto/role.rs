use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Object};
use serde::{Deserialize, Serialize};

use crate::types::db::{permission, role};
use crate::types::dto::common::timestamp_to_rfc3339;

/// Role as returned by the admin API
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,

    /// Keys of the permissions granted by this role
    pub permissions: Vec<String>,
}

impl RoleResponse {
    pub fn from_model(role: role::Model, permissions: &[permission::Model]) -> Self {
        Self {
            id: role.id,
            name: role.name,
            description: role.description,
            created_at: timestamp_to_rfc3339(role.created_at),
            permissions: permissions.iter().map(|p| p.key.clone()).collect(),
        }
    }
}

/// Request model for creating a role
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    pub name: String,
    pub description: Option<String>,

    /// Ids of permissions to grant; unknown ids are ignored
    #[oai(default)]
    #[serde(default)]
    pub permission_ids: Vec<i32>,
}

/// Request model for a partial role update
///
/// A present `permissionIds` list, even an empty one, replaces the role's
/// grants; an omitted list leaves them untouched.
#[derive(Object, Debug, Default, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permission_ids: Option<Vec<i32>>,
}

/// Request model for granting a single permission to a role
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct AddPermissionRequest {
    pub permission_id: i32,
}

/// API response for role creation
#[derive(ApiResponse)]
pub enum CreateRoleApiResponse {
    /// Role created
    #[oai(status = 201)]
    Created(Json<RoleResponse>),
}
