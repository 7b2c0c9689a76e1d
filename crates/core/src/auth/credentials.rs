//! Account credentials: the rules a username and password must meet, and
//! Argon2id storage of the password.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{self, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Credential failures.
///
/// `MissingUsername` and `MissingPassword` are the caller's fault; the others
/// mean the hasher or a stored hash is broken.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Username is empty after trimming.
    #[error("Username is required")]
    MissingUsername,

    /// Password is empty.
    #[error("Password is required")]
    MissingPassword,

    /// Argon2 could not produce a hash.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// A stored hash is not a PHC string Argon2 understands.
    #[error("stored password hash is corrupt")]
    CorruptHash,
}

impl CredentialError {
    /// Returns true for errors caused by the submitted credentials.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::MissingUsername | Self::MissingPassword)
    }
}

/// Trims a submitted username and rejects it if nothing is left.
///
/// ```
/// use tally_core::auth::normalize_username;
///
/// assert_eq!(normalize_username("  alice ").unwrap(), "alice");
/// assert!(normalize_username("   ").is_err());
/// ```
pub fn normalize_username(raw: &str) -> Result<&str, CredentialError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(CredentialError::MissingUsername);
    }
    Ok(username)
}

/// Hashes a new account's password. Passwords are taken as-is, spaces included.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    if password.is_empty() {
        return Err(CredentialError::MissingPassword);
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Hash(e.to_string()))
}

/// Checks a login attempt against the stored hash.
///
/// A wrong password is `Ok(false)`, not an error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, CredentialError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| CredentialError::CorruptHash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CredentialError::Hash(e.to_string())),
    }
}
