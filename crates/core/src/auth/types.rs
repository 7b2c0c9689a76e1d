//! Account and session records.

use chrono::{DateTime, Utc};
use tally_shared::types::{SessionId, UserId};

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Argon2id PHC hash.
    pub password_hash: String,
    /// Role carried in issued tokens.
    pub role: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Builds a new account with the default role.
    #[must_use]
    pub fn new(username: &str, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::new(),
            username: username.to_string(),
            password_hash,
            role: super::UserRole::default().to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A refresh-token session. Only a hash of the token is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Session ID.
    pub id: SessionId,
    /// Owning user.
    pub user_id: UserId,
    /// SHA-256 of the refresh token, hex encoded.
    pub token_hash: String,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Set once the session is revoked.
    pub revoked_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Returns true if the session can still mint access tokens at `now`.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}
