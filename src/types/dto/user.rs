use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Object};
use serde::{Deserialize, Serialize};

use crate::types::db::{role, user};
use crate::types::dto::common::timestamp_to_rfc3339;

/// User as returned by the admin API
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,

    /// Names of the roles held by the user
    pub roles: Vec<String>,
}

impl UserResponse {
    pub fn from_model(user: user::Model, roles: &[role::Model]) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
            created_at: timestamp_to_rfc3339(user.created_at),
            updated_at: timestamp_to_rfc3339(user.updated_at),
            roles: roles.iter().map(|r| r.name.clone()).collect(),
        }
    }
}

/// Request model for creating a user
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,

    /// Plaintext password, hashed before storage
    pub password: String,

    #[oai(default = "default_active")]
    #[serde(default = "default_active")]
    pub is_active: bool,

    /// Ids of roles to assign; unknown ids are ignored
    #[oai(default)]
    #[serde(default)]
    pub role_ids: Vec<i32>,
}

fn default_active() -> bool {
    true
}

/// Request model for a partial user update
///
/// Omitted fields are left unchanged. A present `roleIds` list, even an empty
/// one, replaces the user's role assignments.
#[derive(Object, Debug, Default, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
    pub role_ids: Option<Vec<i32>>,
}

/// API response for user creation
#[derive(ApiResponse)]
pub enum CreateUserApiResponse {
    /// User created
    #[oai(status = 201)]
    Created(Json<UserResponse>),
}
