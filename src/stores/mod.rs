// Stores layer - Data access for the user/role/permission graph
pub mod permission_store;
pub mod role_store;
pub mod user_store;

pub use permission_store::PermissionStore;
pub use role_store::RoleStore;
pub use user_store::UserStore;

/// True when the database rejected a write because of a unique index
pub(crate) fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
    matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    )
}
