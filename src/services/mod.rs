// Services layer - Business logic and orchestration
pub mod auth_service;
pub mod credential_hasher;
pub mod crypto;
pub mod input_validation;
pub mod password_validator;
pub mod permission_resolver;
pub mod permission_service;
pub mod role_service;
pub mod seeder;
pub mod token_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use credential_hasher::CredentialHasher;
pub use password_validator::PasswordValidator;
pub use permission_resolver::PermissionResolver;
pub use permission_service::PermissionService;
pub use role_service::RoleService;
pub use seeder::{SeedReport, Seeder};
pub use token_service::TokenService;
pub use user_service::UserService;
