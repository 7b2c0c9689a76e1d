//! Shared types, errors, and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - The wire timestamp codec shared by storage and the projection engine
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and token service

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;


pub use auth::{
    AuthResponse, Claims, CredentialsRequest, RefreshRequest, TokenKind, TokenPair, UserInfo,
};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{IssuedToken, JwtConfig, JwtError, JwtService};
