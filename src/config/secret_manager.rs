use std::fmt;
use thiserror::Error;

use crate::config::env_provider::{EnvironmentProvider, SystemEnvironment};
use crate::config::secret_config::{SecretConfig, SecretType};

pub const JWT_SECRET_MIN_LENGTH: usize = 32;
pub const PEPPER_MIN_LENGTH: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("Required secret '{secret_name}' is missing")]
    Missing { secret_name: String },

    #[error("Secret '{secret_name}' must be at least {expected} characters, got {actual}")]
    InvalidLength {
        secret_name: String,
        expected: usize,
        actual: usize,
    },
}

/// Holds the signing secret and the password pepper
pub struct SecretManager {
    jwt_secret: String,
    pepper: String,
}

impl SecretManager {
    /// Load and validate all secrets from the process environment
    pub fn init() -> Result<Self, SecretError> {
        Self::init_with_provider(&SystemEnvironment)
    }

    pub fn init_with_provider(env: &dyn EnvironmentProvider) -> Result<Self, SecretError> {
        let jwt_secret = Self::load_secret(env, &Self::jwt_config())?;
        let pepper = Self::load_secret(env, &Self::pepper_config())?;

        Ok(Self { jwt_secret, pepper })
    }

    /// Build from known values, still enforcing the length rules
    pub fn from_secrets(jwt_secret: &str, pepper: &str) -> Result<Self, SecretError> {
        Self::check_length(&Self::jwt_config(), jwt_secret)?;
        Self::check_length(&Self::pepper_config(), pepper)?;

        Ok(Self {
            jwt_secret: jwt_secret.to_string(),
            pepper: pepper.to_string(),
        })
    }

    fn jwt_config() -> SecretConfig {
        SecretConfig::env("JWT_SECRET").min_length(JWT_SECRET_MIN_LENGTH)
    }

    fn pepper_config() -> SecretConfig {
        SecretConfig::env("PASSWORD_PEPPER").min_length(PEPPER_MIN_LENGTH)
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn pepper(&self) -> &str {
        &self.pepper
    }

    pub(crate) fn load_secret(
        env: &dyn EnvironmentProvider,
        config: &SecretConfig,
    ) -> Result<String, SecretError> {
        let value = match &config.secret_type {
            SecretType::EnvVar { name } => match env.get_var(name) {
                Some(v) if !v.is_empty() => v,
                _ => {
                    return Err(SecretError::Missing {
                        secret_name: name.clone(),
                    });
                }
            },
        };

        Self::check_length(config, &value)?;
        Ok(value)
    }

    fn check_length(config: &SecretConfig, value: &str) -> Result<(), SecretError> {
        let actual = value.chars().count();
        match config.min_length {
            Some(expected) if actual < expected => Err(SecretError::InvalidLength {
                secret_name: config.secret_type.name().to_string(),
                expected,
                actual,
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .field("pepper", &"<redacted>")
            .finish()
    }
}
