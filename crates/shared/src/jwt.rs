//! JWT token generation and validation.
//!
//! Provides secure JWT handling with access and refresh tokens.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::auth::{Claims, TokenKind};
use crate::types::UserId;

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expires_secs: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_expires_secs: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            access_token_expires_secs: 86400,
            refresh_token_expires_secs: 7 * 86400,
        }
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token is valid but of the wrong kind.
    #[error("invalid token")]
    Invalid,
}

/// A freshly signed token together with its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Encoded JWT.
    pub token: String,
    /// Expiration instant.
    pub expires_at: DateTime<Utc>,
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expires_secs", &self.config.access_token_expires_secs)
            .field("refresh_token_expires_secs", &self.config.refresh_token_expires_secs)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generates an access token for a user.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_access_token(
        &self,
        user_id: UserId,
        username: &str,
        role: &str,
    ) -> Result<IssuedToken, JwtError> {
        let expires_at = Utc::now() + Duration::seconds(self.config.access_token_expires_secs);
        self.sign(Claims::new(
            user_id,
            username,
            role,
            TokenKind::Access,
            expires_at,
        ))
    }

    /// Generates a refresh token for a user.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_refresh_token(
        &self,
        user_id: UserId,
        username: &str,
        role: &str,
    ) -> Result<IssuedToken, JwtError> {
        let expires_at = Utc::now() + Duration::seconds(self.config.refresh_token_expires_secs);
        self.sign(Claims::new(
            user_id,
            username,
            role,
            TokenKind::Refresh,
            expires_at,
        ))
    }

    fn sign(&self, claims: Claims) -> Result<IssuedToken, JwtError> {
        let expires_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now);
        encode(&Header::default(), &claims, &self.encoding_key)
            .map(|token| IssuedToken { token, expires_at })
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates and decodes a token of any kind.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired.
    /// Returns `JwtError::DecodingError` if the token is malformed or badly signed.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::default();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }

    /// Validates a token and requires it to be of `kind`.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Invalid` if the token decodes but has another kind.
    pub fn validate_kind(&self, token: &str, kind: TokenKind) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.kind == kind {
            Ok(claims)
        } else {
            Err(JwtError::Invalid)
        }
    }

    /// Returns the access token expiration in seconds.
    #[must_use]
    pub const fn access_token_expires_in(&self) -> i64 {
        self.config.access_token_expires_secs
    }

    /// Returns the refresh token expiration in seconds.
    #[must_use]
    pub const fn refresh_token_expires_in(&self) -> i64 {
        self.config.refresh_token_expires_secs
    }
}
