use crate::errors::api::ApiError;
use crate::errors::internal::{
    CredentialError, InternalError, JwtValidationError, RbacError, ValidationError,
};
use crate::types::internal::Permission;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use poem_openapi::error::{AuthorizationError, ParseParamError, ParseRequestPayloadError};
use sea_orm::DbErr;

#[test]
fn test_database_error_maps_to_generic_500() {
    let err = InternalError::database("insert_user", DbErr::Custom("disk full".to_string()));
    let api_error = ApiError::from_internal_error(err);

    assert!(matches!(api_error, ApiError::InternalError(_)));
    assert_eq!(api_error.status_code(), 500);
    assert!(!api_error.message().contains("disk full"));
}

#[test]
fn test_invalid_credentials_maps_to_401() {
    let api_error =
        ApiError::from_internal_error(InternalError::Credential(CredentialError::InvalidCredentials));

    assert!(matches!(api_error, ApiError::Unauthorized(_)));
    assert_eq!(api_error.code(), "invalid_credentials");
}

#[test]
fn test_expired_and_invalid_tokens_have_distinct_codes() {
    let expired = ApiError::from_internal_error(InternalError::Token(JwtValidationError::from(
        JwtError::from(ErrorKind::ExpiredSignature),
    )));
    let invalid = ApiError::from_internal_error(InternalError::Token(JwtValidationError::from(
        JwtError::from(ErrorKind::InvalidSignature),
    )));

    assert_eq!(expired.status_code(), 401);
    assert_eq!(invalid.status_code(), 401);
    assert_eq!(expired.code(), "expired_token");
    assert_eq!(invalid.code(), "invalid_token");
}

#[test]
fn test_duplicate_email_maps_to_409() {
    let api_error = ApiError::from_internal_error(InternalError::Rbac(RbacError::DuplicateEmail {
        email: "a@example.com".to_string(),
    }));

    assert!(matches!(api_error, ApiError::Conflict(_)));
    assert_eq!(api_error.status_code(), 409);
}

#[test]
fn test_missing_role_and_unassigned_pair_map_to_404() {
    let missing = ApiError::from_internal_error(InternalError::Rbac(RbacError::RoleNotFound {
        role_id: 9,
    }));
    let unassigned =
        ApiError::from_internal_error(InternalError::Rbac(RbacError::PermissionNotAssigned {
            role_id: 1,
            permission_id: 2,
        }));

    assert!(matches!(missing, ApiError::NotFound(_)));
    assert!(matches!(unassigned, ApiError::NotFound(_)));
}

#[test]
fn test_validation_error_message_is_passed_through() {
    let api_error = ApiError::from_internal_error(InternalError::Validation(
        ValidationError::PasswordTooShort { min: 8 },
    ));

    assert!(matches!(api_error, ApiError::BadRequest(_)));
    assert_eq!(
        api_error.message(),
        "Password must be at least 8 characters long"
    );
}

#[test]
fn test_forbidden_names_required_permission() {
    let api_error = ApiError::forbidden(Permission::UsersDelete);

    assert_eq!(api_error.status_code(), 403);
    assert!(api_error.message().contains("users.delete"));
    assert_eq!(api_error.to_string(), api_error.message());
}

#[test]
fn test_missing_bearer_token_maps_to_invalid_token() {
    let api_error = ApiError::from_authorization_error(AuthorizationError);

    assert!(matches!(api_error, ApiError::Unauthorized(_)));
    assert_eq!(api_error.code(), "invalid_token");
    assert_eq!(api_error.status_code(), 401);
}

#[test]
fn test_undecodable_body_maps_to_validation_error() {
    let api_error = ApiError::from_payload_error(ParseRequestPayloadError {
        reason: "key must be a string".to_string(),
    });

    assert!(matches!(api_error, ApiError::BadRequest(_)));
    assert_eq!(api_error.code(), "validation_error");
    assert!(api_error.message().contains("key must be a string"));
}

#[test]
fn test_unparseable_path_parameter_maps_to_validation_error() {
    let api_error = ApiError::from_param_error(ParseParamError {
        name: "id",
        reason: "invalid digit found in string".to_string(),
    });

    assert_eq!(api_error.status_code(), 400);
    assert!(api_error.message().contains("'id'"));
}
