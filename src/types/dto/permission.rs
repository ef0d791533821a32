use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::permission;

/// Entry of the permission catalog
#[derive(Object, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionResponse {
    pub id: i32,
    pub key: String,
    pub description: Option<String>,
}

impl From<permission::Model> for PermissionResponse {
    fn from(p: permission::Model) -> Self {
        Self {
            id: p.id,
            key: p.key,
            description: p.description,
        }
    }
}
