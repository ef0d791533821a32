use crate::errors::internal::ValidationError;

pub const ROLE_NAME_MAX_LENGTH: usize = 100;

/// Treat blank strings as absent
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn require_non_blank(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

/// Syntactic plausibility only: one `@`, non-empty local part, dotted domain, no whitespace
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    require_non_blank(email, "email")?;

    let invalid = || ValidationError::InvalidEmail {
        email: email.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }

    Ok(())
}

pub fn validate_role_name(name: &str) -> Result<(), ValidationError> {
    require_non_blank(name, "name")?;

    if name.chars().count() > ROLE_NAME_MAX_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name",
            max: ROLE_NAME_MAX_LENGTH,
        });
    }

    Ok(())
}
