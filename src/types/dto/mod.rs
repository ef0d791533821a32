// Request/response models exposed through the OpenAPI surface
pub mod auth;
pub mod common;
pub mod permission;
pub mod role;
pub mod user;
