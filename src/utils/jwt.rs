// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, models::user::AuthUser};

/// JWT Claims structure: the identity assertion carried by every bearer token.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject - Stores the User ID.
    pub sub: String,
    pub email: String,
    pub username: String,
    /// Issued-at as Unix timestamp.
    pub iat: u64,
    /// Expiration time as Unix timestamp.
    pub exp: u64,
}

impl Claims {
    pub fn user(&self) -> AuthUser {
        AuthUser {
            user_id: self.sub.clone(),
            email: self.email.clone(),
            username: self.username.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid(e) => AppError::Unauthorized(e.to_string()),
            TokenError::Signing(msg) => AppError::InternalServerError(msg),
        }
    }
}

/// Issues and verifies HS256 tokens with a process-wide secret.
///
/// Only the auth service holds a codec; everyone else asks the auth service.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    /// Token lifetime in seconds.
    ttl: u64,
}

impl TokenCodec {
    pub fn new(secret: &str, ttl: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No grace period: a token is dead the second after `exp`.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Signs a new token for the user, valid from now for the configured lifetime.
    pub fn issue(&self, user: &AuthUser) -> Result<String, TokenError> {
        self.issue_at(user, unix_now()?)
    }

    /// Signs a token as if it had been issued at `issued_at` (Unix seconds).
    pub fn issue_at(&self, user: &AuthUser, issued_at: u64) -> Result<String, TokenError> {
        let exp = issued_at
            .checked_add(self.ttl)
            .ok_or_else(|| TokenError::Signing("token lifetime overflows exp".to_string()))?;
        let claims = Claims {
            sub: user.user_id.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            iat: issued_at,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verifies signature and expiry, returning the decoded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(token_data.claims)
    }
}

fn unix_now() -> Result<u64, TokenError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| TokenError::Signing(e.to_string()))
}
