use std::sync::Arc;

use crate::errors::ApiError;
use crate::services::TokenService;
use crate::types::internal::Permission;
use crate::types::internal::auth::Claims;

/// Per-endpoint authorization check
///
/// Every protected operation names exactly one required `Permission`. The
/// gate verifies the bearer token (401 when invalid or expired) and then
/// checks that the required key is present in the token's permission claim
/// (403 when absent). Permissions are read from the token only, so role
/// changes apply once the user logs in again.
pub struct PolicyGate {
    token_service: Arc<TokenService>,
}

impl PolicyGate {
    pub fn new(token_service: Arc<TokenService>) -> Self {
        Self { token_service }
    }

    /// Verify the token without requiring any particular permission
    pub fn authenticate(&self, token: &str) -> Result<Claims, ApiError> {
        self.token_service
            .validate(token)
            .map_err(ApiError::from_internal_error)
    }

    /// Verify the token and require `required` among its permissions
    pub fn authorize(&self, token: &str, required: Permission) -> Result<Claims, ApiError> {
        let claims = self.authenticate(token)?;

        if !claims.permission_set().contains(required) {
            tracing::debug!(
                subject = %claims.sub,
                "Denied: missing permission {}",
                required
            );
            return Err(ApiError::forbidden(required));
        }

        Ok(claims)
    }
}
