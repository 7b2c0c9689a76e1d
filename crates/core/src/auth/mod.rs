//! Accounts, sessions, credentials and roles.

mod credentials;
mod types;

pub use credentials::{CredentialError, hash_password, normalize_username, verify_password};
pub use types::{Session, User};

use serde::{Deserialize, Serialize};

/// Account roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular account, owns its own budgets.
    #[default]
    User,
    /// Operator account.
    Admin,
}

impl UserRole {
    /// Returns the role as stored and carried in tokens.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
