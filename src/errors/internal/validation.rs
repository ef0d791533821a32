use thiserror::Error;

/// Malformed input rejected before touching the database
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("Invalid email address: {email}")]
    InvalidEmail { email: String },

    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },

    #[error("Password must be less than {max} characters")]
    PasswordTooLong { max: usize },

    #[error("Password must contain at least one uppercase letter, one lowercase letter, one number, and one special character (@$!%*?&)")]
    PasswordTooWeak,

    #[error("Password may only contain letters, digits, and @$!%*?&")]
    PasswordInvalidCharacter,

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}
