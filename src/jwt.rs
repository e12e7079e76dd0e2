//! JWT token issuance and validation.
//!
//! Every token is bound to a server-side session record: the `sessionId`
//! claim is the join key, and `exp` is copied from the session's
//! `expires_at` at issuance so the two lifetimes cannot drift. Claim-level
//! expiry is only a cheap pre-check; the session record stays authoritative.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Default session and token lifetime: 15 minutes.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 15 * 60;

/// JWT claims for a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user UUID)
    pub sub: String,
    /// User email
    pub email: String,
    /// Session record ID (join key to server-side state)
    #[serde(rename = "sessionId")]
    pub session_id: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp), equal to the session's expires_at
    pub exp: u64,
}

/// Configuration for JWT operations.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a token for a session. `expires_at` must be the session
    /// record's expiry so token and record stay in lockstep.
    pub fn issue(
        &self,
        user_uuid: &str,
        email: &str,
        session_id: &str,
        expires_at: u64,
    ) -> Result<String, JwtError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| JwtError::TimeError)?
            .as_secs();

        let claims = SessionClaims {
            sub: user_uuid.to_string(),
            email: email.to_string(),
            session_id: session_id.to_string(),
            iat: now,
            exp: expires_at,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(JwtError::Encoding)
    }

    /// Validate signature and shape, and decode the claims.
    ///
    /// Deserializing into `SessionClaims` rejects tokens missing any of
    /// the required claims. Expired claims are rejected here too (zero
    /// leeway), but callers must still consult the session record before
    /// admitting the request.
    pub fn validate(&self, token: &str) -> Result<SessionClaims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data =
            jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &validation)
                .map_err(JwtError::Decoding)?;

        Ok(token_data.claims)
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug)]
pub enum JwtError {
    /// Error encoding the token
    Encoding(jsonwebtoken::errors::Error),
    /// Error decoding the token
    Decoding(jsonwebtoken::errors::Error),
    /// System time error
    TimeError,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
            JwtError::Decoding(e) => write!(f, "Failed to decode token: {}", e),
            JwtError::TimeError => write!(f, "System time error"),
        }
    }
}

impl std::error::Error for JwtError {}
