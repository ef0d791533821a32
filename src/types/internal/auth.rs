use serde::{Deserialize, Serialize};

use crate::errors::InternalError;
use crate::types::internal::permission::PermissionSet;

/// JWT Claims structure
///
/// The effective permission set is embedded at issuance time; changes to a
/// user's roles only take effect once a new token is issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Email of the user at issuance time
    pub email: String,

    /// Effective permission keys
    #[serde(default)]
    pub permissions: Vec<String>,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Unique token id
    pub jti: String,
}

impl Claims {
    /// Parse the subject back into a numeric user id
    pub fn user_id(&self) -> Result<i32, InternalError> {
        self.sub
            .parse::<i32>()
            .map_err(|e| InternalError::parse("user_id", format!("{}: {}", self.sub, e)))
    }

    /// Permission claim as a set for membership checks
    pub fn permission_set(&self) -> PermissionSet {
        self.permissions.iter().map(String::as_str).collect()
    }
}
