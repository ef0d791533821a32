use crate::errors::internal::{
    CredentialError, DatabaseError, InternalError, JwtFailClass, RbacError,
};
use crate::types::dto::common::ErrorResponse;
use crate::types::internal::Permission;
use poem_openapi::error::{AuthorizationError, ParseParamError, ParseRequestPayloadError};
use poem_openapi::{ApiResponse, payload::Json};
use std::fmt;

/// Error responses shared by every endpoint
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Request body or parameters failed validation
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Missing, invalid or expired credentials
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Authenticated but lacking the required permission
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Resource not found
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Uniqueness or association conflict
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

fn body(error: &str, message: impl Into<String>, status_code: u16) -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code,
    })
}

impl ApiError {
    /// Create a BadRequest error
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::BadRequest(body("validation_error", message, 400))
    }

    /// Create an Unauthorized error for a failed login
    pub fn invalid_credentials() -> Self {
        ApiError::Unauthorized(body("invalid_credentials", "Invalid email or password", 401))
    }

    /// Create an Unauthorized error for a bad token
    pub fn invalid_token() -> Self {
        ApiError::Unauthorized(body("invalid_token", "Invalid or malformed JWT", 401))
    }

    /// Create an Unauthorized error for a request without a bearer token
    pub fn missing_token() -> Self {
        ApiError::Unauthorized(body("invalid_token", "Missing bearer token", 401))
    }

    /// Create an Unauthorized error for an expired token
    pub fn expired_token() -> Self {
        ApiError::Unauthorized(body("expired_token", "JWT has expired", 401))
    }

    /// Create a Forbidden error naming the missing permission
    pub fn forbidden(required: Permission) -> Self {
        ApiError::Forbidden(body(
            "forbidden",
            format!("Missing required permission: {}", required),
            403,
        ))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(body("not_found", message, 404))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(body("conflict", message, 409))
    }

    /// Create a generic internal server error
    ///
    /// Always returns a generic message without exposing internal details.
    pub fn internal_server_error() -> Self {
        ApiError::InternalError(body("internal_error", "An internal error occurred", 500))
    }

    /// Security scheme rejected the request before the handler ran
    pub fn from_authorization_error(_err: AuthorizationError) -> Self {
        Self::missing_token()
    }

    /// Request body could not be decoded into the operation's payload type
    pub fn from_payload_error(err: ParseRequestPayloadError) -> Self {
        tracing::debug!("Rejected request payload: {}", err.reason);
        Self::validation(format!("Invalid request body: {}", err.reason))
    }

    /// Path or query parameter could not be parsed
    pub fn from_param_error(err: ParseParamError) -> Self {
        Self::validation(format!("Invalid parameter '{}': {}", err.name, err.reason))
    }

    /// Convert InternalError to ApiError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            // Infrastructure errors - always log and return generic error
            InternalError::Database(DatabaseError::Operation { operation, .. }) => {
                tracing::error!("Database error in {}: {}", operation, err);
                Self::internal_server_error()
            }
            InternalError::Database(_) => {
                tracing::error!("Transaction error: {}", err);
                Self::internal_server_error()
            }
            InternalError::Parse { value_type, .. } => {
                tracing::error!("Parse error for {}: {}", value_type, err);
                Self::internal_server_error()
            }
            InternalError::Crypto { operation, .. } => {
                tracing::error!("Crypto error in {}: {}", operation, err);
                Self::internal_server_error()
            }

            // Domain errors - convert to specific API errors
            InternalError::Credential(CredentialError::InvalidCredentials) => {
                tracing::debug!("Invalid credentials attempt");
                Self::invalid_credentials()
            }
            InternalError::Credential(CredentialError::ActiveUserNotFound { user_id }) => {
                tracing::debug!("Token subject {} is not an active user", user_id);
                Self::not_found("User not found")
            }
            InternalError::Validation(validation) => {
                tracing::debug!("Validation failed: {}", validation);
                Self::validation(validation.to_string())
            }
            InternalError::Token(token) => {
                tracing::debug!("Token rejected: {}", token);
                match token.class {
                    JwtFailClass::Expired => Self::expired_token(),
                    JwtFailClass::Internal => {
                        tracing::error!("Token validation internal failure: {}", token);
                        Self::internal_server_error()
                    }
                    _ => Self::invalid_token(),
                }
            }
            InternalError::Rbac(rbac) => {
                tracing::debug!("RBAC operation rejected: {}", rbac);
                match rbac {
                    RbacError::DuplicateEmail { .. } => Self::conflict("Email already exists"),
                    RbacError::DuplicateRoleName { .. } => {
                        Self::conflict("Role name already exists")
                    }
                    RbacError::PermissionAlreadyAssigned { .. } => {
                        Self::conflict("Permission already assigned to role")
                    }
                    RbacError::UserNotFound { .. } => Self::not_found("User not found"),
                    RbacError::RoleNotFound { .. } => Self::not_found("Role not found"),
                    RbacError::PermissionNotFound { .. } => {
                        Self::not_found("Permission not found")
                    }
                    RbacError::PermissionNotAssigned { .. } => {
                        Self::not_found("Permission is not assigned to role")
                    }
                }
            }
        }
    }

    fn response(&self) -> &ErrorResponse {
        match self {
            ApiError::BadRequest(json)
            | ApiError::Unauthorized(json)
            | ApiError::Forbidden(json)
            | ApiError::NotFound(json)
            | ApiError::Conflict(json)
            | ApiError::InternalError(json) => &json.0,
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.response().message.clone()
    }

    /// Get the machine-readable error code
    pub fn code(&self) -> &str {
        &self.response().error
    }

    pub fn status_code(&self) -> u16 {
        self.response().status_code
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
