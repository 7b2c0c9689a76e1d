//! Common types used across the application.

pub mod id;
pub mod timestamp;

pub use id::*;
pub use timestamp::{TimestampError, format_timestamp, parse_timestamp};
