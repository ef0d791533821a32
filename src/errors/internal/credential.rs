use thiserror::Error;

/// Authentication failures around the credential store
#[derive(Error, Debug)]
pub enum CredentialError {
    /// Unknown email, wrong password, or inactive account. Callers never learn which.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Token subject does not resolve to an active user
    #[error("Active user not found: {user_id}")]
    ActiveUserNotFound { user_id: i32 },
}
