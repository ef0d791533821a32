use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::fmt;
use uuid::Uuid;

use crate::config::JwtSettings;
use crate::errors::InternalError;
use crate::errors::internal::JwtValidationError;
use crate::types::internal::PermissionSet;
use crate::types::internal::auth::Claims;

/// Clock skew tolerated past `exp`, in seconds
pub const EXPIRY_LEEWAY_SECONDS: u64 = 0;

/// Signs and verifies HS256 access tokens carrying the effective permission set
pub struct TokenService {
    jwt_secret: String,
    settings: JwtSettings,
}

impl TokenService {
    pub fn new(jwt_secret: &str, settings: JwtSettings) -> Self {
        Self {
            jwt_secret: jwt_secret.to_string(),
            settings,
        }
    }

    /// Issue a JWT for the given identity and permissions
    ///
    /// # Returns
    /// * `Ok((token, claims))` - The encoded JWT and the claims it carries
    pub fn issue(
        &self,
        user_id: i32,
        email: &str,
        permissions: &PermissionSet,
    ) -> Result<(String, Claims), InternalError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            permissions: permissions.to_vec(),
            iss: self.settings.issuer.clone(),
            aud: self.settings.audience.clone(),
            iat: now,
            exp: now + self.settings.expiration_minutes * 60,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_encode", e.to_string()))?;

        Ok((token, claims))
    }

    /// Verify signature, issuer, audience and expiry, returning the claims
    pub fn validate(&self, token: &str) -> Result<Claims, InternalError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.settings.issuer]);
        validation.set_audience(&[&self.settings.audience]);
        validation.leeway = EXPIRY_LEEWAY_SECONDS;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(JwtValidationError::from)?;

        Ok(token_data.claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("issuer", &self.settings.issuer)
            .field("audience", &self.settings.audience)
            .field("expiration_minutes", &self.settings.expiration_minutes)
            .finish()
    }
}

impl fmt::Display for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TokenService {{ issuer: {}, jwt_expiration: {}min }}",
            self.settings.issuer, self.settings.expiration_minutes
        )
    }
}
