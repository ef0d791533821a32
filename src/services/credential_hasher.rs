use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use std::fmt;

use crate::errors::InternalError;

/// Argon2id password hashing keyed with the server-side pepper
pub struct CredentialHasher {
    pepper: String,
}

impl CredentialHasher {
    pub fn new(pepper: &str) -> Self {
        Self {
            pepper: pepper.to_string(),
        }
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    /// Hash a plaintext password into a PHC string
    pub fn hash(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);

        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| InternalError::crypto("password_hash", e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Check a plaintext password against a stored hash
    ///
    /// A stored hash that cannot be parsed counts as a mismatch.
    pub fn verify(&self, password: &str, password_hash: &str) -> Result<bool, InternalError> {
        let parsed = match PasswordHash::new(password_hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Stored password hash is unreadable: {}", e);
                return Ok(false);
            }
        };

        Ok(self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

impl fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("pepper", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hasher = CredentialHasher::new("test-pepper-for-unit-tests");
        let hash = hasher.hash("Passw0rd!").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("Passw0rd!", &hash).unwrap());
        assert!(!hasher.verify("passw0rd!", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let hasher = CredentialHasher::new("test-pepper-for-unit-tests");
        assert_ne!(hasher.hash("Passw0rd!").unwrap(), hasher.hash("Passw0rd!").unwrap());
    }

    #[test]
    fn test_different_pepper_fails_verification() {
        let hash = CredentialHasher::new("test-pepper-for-unit-tests")
            .hash("Passw0rd!")
            .unwrap();
        let other = CredentialHasher::new("another-pepper-value-here");

        assert!(!other.verify("Passw0rd!", &hash).unwrap());
    }

    #[test]
    fn test_garbage_hash_is_mismatch() {
        let hasher = CredentialHasher::new("test-pepper-for-unit-tests");
        assert!(!hasher.verify("Passw0rd!", "not-a-phc-string").unwrap());
    }
}
