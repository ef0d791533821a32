use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JwtFailClass {
    /// Token is not structurally a JWT or cannot be decoded
    Malformed,

    /// Token is structurally valid but cryptographic verification failed
    Invalid,

    /// Token verified but its lifetime is over
    Expired,

    /// Token verified but rejected by claim validation (nbf, aud, iss, required claims)
    ClaimsRejected,

    /// Token uses unsupported / disallowed algorithm or key format
    Unsupported,

    /// Internal error during validation
    Internal,
}

#[derive(Debug, Error)]
#[error("JWT validation failed: {class:?} ({note})")]
pub struct JwtValidationError {
    pub class: JwtFailClass,

    /// Small, stable hint like "expired", "aud", "iss", "signature", "malformed"
    pub note: &'static str,

    #[source]
    pub source: Option<jsonwebtoken::errors::Error>,
}

impl JwtValidationError {
    pub fn is_expired(&self) -> bool {
        self.class == JwtFailClass::Expired
    }
}

impl From<jsonwebtoken::errors::Error> for JwtValidationError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        let (class, note) = classify_jwt_error(&err);
        Self {
            class,
            note,
            source: Some(err),
        }
    }
}

fn classify_jwt_error(err: &jsonwebtoken::errors::Error) -> (JwtFailClass, &'static str) {
    use jsonwebtoken::errors::ErrorKind::*;

    match err.kind() {
        InvalidToken | Base64(_) | Json(_) | Utf8(_) => (JwtFailClass::Malformed, "malformed"),

        InvalidSignature | InvalidAlgorithm => (JwtFailClass::Invalid, "signature"),

        ExpiredSignature => (JwtFailClass::Expired, "expired"),

        InvalidAudience => (JwtFailClass::ClaimsRejected, "aud"),
        InvalidIssuer => (JwtFailClass::ClaimsRejected, "iss"),
        ImmatureSignature | InvalidSubject | MissingRequiredClaim(_) => {
            (JwtFailClass::ClaimsRejected, "claims")
        }

        MissingAlgorithm | InvalidAlgorithmName | InvalidKeyFormat => {
            (JwtFailClass::Unsupported, "algorithm")
        }

        _ => (JwtFailClass::Internal, "internal"),
    }
}
