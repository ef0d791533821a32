use thiserror::Error;

/// Domain errors raised while mutating the user/role/permission graph
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RbacError {
    #[error("Email already exists: {email}")]
    DuplicateEmail { email: String },

    #[error("Role name already exists: {name}")]
    DuplicateRoleName { name: String },

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i32 },

    #[error("Role not found: {role_id}")]
    RoleNotFound { role_id: i32 },

    #[error("Permission not found: {permission_id}")]
    PermissionNotFound { permission_id: i32 },

    #[error("Permission {permission_id} already assigned to role {role_id}")]
    PermissionAlreadyAssigned { role_id: i32, permission_id: i32 },

    #[error("Permission {permission_id} is not assigned to role {role_id}")]
    PermissionNotAssigned { role_id: i32, permission_id: i32 },
}
