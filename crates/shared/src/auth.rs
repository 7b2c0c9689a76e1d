//! Authentication types for JWT and tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived token sent with every request.
    Access,
    /// Long-lived token exchanged for a new access token.
    Refresh,
}

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: UserId,
    /// Username at issue time.
    pub username: String,
    /// User's role.
    pub role: String,
    /// Token kind.
    pub kind: TokenKind,
    /// Unique token ID, keeps refresh tokens issued in the same second distinct.
    pub jti: uuid::Uuid,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: UserId,
        username: &str,
        role: &str,
        kind: TokenKind,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            username: username.to_string(),
            role: role.to_string(),
            kind,
            jti: uuid::Uuid::new_v4(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.sub
    }
}

/// Token pair returned after successful authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Access token (short-lived).
    pub access_token: String,
    /// Refresh token (long-lived).
    pub refresh_token: String,
    /// Access token expiration in seconds.
    pub expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair.
    #[must_use]
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
        }
    }
}

/// Login and registration request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsRequest {
    /// Username.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Token refresh request payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// The refresh token issued at login.
    pub refresh_token: String,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: UserId,
    /// Username.
    pub username: String,
    /// Role.
    pub role: String,
}

/// Login and registration response payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Authenticated user info.
    pub user: UserInfo,
    /// Issued tokens.
    #[serde(flatten)]
    pub tokens: TokenPair,
}
