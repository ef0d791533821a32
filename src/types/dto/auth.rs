use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Request model for user login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address of the account
    pub email: String,

    /// Password for authentication
    pub password: String,
}

/// Response model returned after a successful login
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Signed bearer token (JWT)
    pub token: String,

    /// Id of the authenticated user
    pub user_id: i32,

    /// Email of the authenticated user
    pub email: String,

    /// Effective permission keys embedded in the token
    pub permissions: Vec<String>,
}

/// Response model for the current user endpoint
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: i32,
    pub email: String,
    pub is_active: bool,

    /// Names of the roles held by the user
    pub roles: Vec<String>,

    /// Effective permission keys, resolved at request time
    pub permissions: Vec<String>,
}
