use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::stores::PermissionStore;
use crate::types::db::permission;

/// Read access to the permission catalog
pub struct PermissionService {
    app_data: Arc<AppData>,
    permission_store: Arc<PermissionStore>,
}

impl PermissionService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            permission_store: app_data.permission_store.clone(),
            app_data,
        }
    }

    /// Every permission, ordered by key
    pub async fn list(&self) -> Result<Vec<permission::Model>, InternalError> {
        self.permission_store.list(&self.app_data.db).await
    }
}
