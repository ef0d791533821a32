use poem_openapi::{OpenApi, Tags, payload::Json};
use std::sync::Arc;

use crate::api::auth::BearerAuth;
use crate::app_data::AppData;
use crate::auth::PolicyGate;
use crate::errors::ApiError;
use crate::services::PermissionService;
use crate::types::dto::permission::PermissionResponse;
use crate::types::internal::Permission;

#[derive(Tags)]
enum PermissionTags {
    /// Permission catalog
    Permissions,
}

pub struct PermissionApi {
    permission_service: PermissionService,
    gate: Arc<PolicyGate>,
}

impl PermissionApi {
    pub fn new(app_data: Arc<AppData>, gate: Arc<PolicyGate>) -> Self {
        Self {
            permission_service: PermissionService::new(app_data),
            gate,
        }
    }
}

#[OpenApi]
impl PermissionApi {
    /// List the permission catalog ordered by key
    #[oai(path = "/permissions", method = "get", tag = "PermissionTags::Permissions")]
    async fn list_permissions(
        &self,
        auth: BearerAuth,
    ) -> Result<Json<Vec<PermissionResponse>>, ApiError> {
        self.gate.authorize(auth.token(), Permission::PermissionsView)?;

        let permissions = self
            .permission_service
            .list()
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(permissions.into_iter().map(PermissionResponse::from).collect()))
    }
}
