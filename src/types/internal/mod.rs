pub mod auth;
pub mod permission;

pub use permission::{Permission, PermissionSet};
