/// Signed session-token issuance and validation
use crate::error::{ApiError, ApiResult};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claim set carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject user id
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

/// Encodes and decodes signed, expiring session tokens with a shared secret
#[derive(Debug, Clone)]
pub struct SessionTokenIssuer {
    secret: String,
    algorithm: Algorithm,
    ttl_secs: i64,
}

impl SessionTokenIssuer {
    pub fn new(secret: impl Into<String>, algorithm: &str, ttl_secs: i64) -> ApiResult<Self> {
        let algorithm = algorithm
            .parse::<Algorithm>()
            .map_err(|_| ApiError::Validation(format!("Unknown JWT algorithm: {}", algorithm)))?;

        Ok(Self {
            secret: secret.into(),
            algorithm,
            ttl_secs,
        })
    }

    /// Sign a claim set for the given subject
    pub fn encode(&self, user_id: &str, username: &str) -> ApiResult<String> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        encode(
            &Header::new(self.algorithm),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("Failed to sign session token: {}", e)))
    }

    /// Verify a session token and return its claims
    ///
    /// Fails closed: a missing or past `exp` claim rejects the token, as does
    /// a bad signature or malformed structure.
    pub fn decode(&self, token: &str) -> ApiResult<SessionClaims> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_required_spec_claims(&["exp"]);
        // Allow a little clock skew between issuer and verifier
        validation.leeway = 30;

        decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::warn!("session token rejected: {}", e);
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    ApiError::InvalidToken("Token has expired".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    ApiError::InvalidToken("Invalid token signature".to_string())
                }
                _ => ApiError::InvalidToken(format!("{}", e)),
            }
        })
    }
}
