use crate::errors::internal::ValidationError;

pub const PASSWORD_SPECIAL_CHARACTERS: &str = "@$!%*?&";

/// Password policy applied when creating users or changing a password
///
/// Rules, checked in order:
/// 1. Length between `min_length` and `max_length` characters
/// 2. Only ASCII letters, digits and `@$!%*?&`
/// 3. At least one lowercase, one uppercase, one digit and one special character
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
    max_length: usize,
}

impl Default for PasswordValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordValidator {
    pub fn new() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
        }
    }

    pub fn validate(&self, password: &str) -> Result<(), ValidationError> {
        let length = password.chars().count();
        if length < self.min_length {
            return Err(ValidationError::PasswordTooShort {
                min: self.min_length,
            });
        }
        if length > self.max_length {
            return Err(ValidationError::PasswordTooLong {
                max: self.max_length,
            });
        }

        if !password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIAL_CHARACTERS.contains(c))
        {
            return Err(ValidationError::PasswordInvalidCharacter);
        }

        let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        let has_special = password.chars().any(|c| PASSWORD_SPECIAL_CHARACTERS.contains(c));

        if !(has_lower && has_upper && has_digit && has_special) {
            return Err(ValidationError::PasswordTooWeak);
        }

        Ok(())
    }
}
