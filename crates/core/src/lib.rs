//! Core business logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `budget` - Budget and entry records, creation and patch validation
//! - `projection` - Entry classification and the budget projection engine
//! - `day_shift` - Moving a budget's start date by one day
//! - `clock` - Source of the reference instant
//! - `auth` - Password hashing and user roles
//! - `store` - Storage traits implemented by `tally-db`

pub mod auth;
pub mod budget;
pub mod clock;
pub mod day_shift;
pub mod projection;
pub mod store;
