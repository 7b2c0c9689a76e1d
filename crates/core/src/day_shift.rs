//! Moving a budget's start date by one day.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Utc};
use tally_shared::types::{TimestampError, format_timestamp, parse_timestamp};
use thiserror::Error;

/// Which way to move the start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    /// One day later.
    Add,
    /// One day earlier.
    Remove,
}

/// Unknown shift direction in a request path.
#[derive(Debug, Error)]
#[error("unknown day shift `{0}`: expected `add` or `remove`")]
pub struct UnknownShiftDirection(pub String);

impl FromStr for ShiftDirection {
    type Err = UnknownShiftDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            other => Err(UnknownShiftDirection(other.to_string())),
        }
    }
}

/// Why a start date could not be shifted.
#[derive(Debug, Error)]
pub enum ShiftError {
    /// The stored start date does not parse.
    #[error(transparent)]
    Malformed(#[from] TimestampError),

    /// The shifted date would leave the four-digit years the wire format holds.
    #[error("start date cannot move past year 0000 or 9999")]
    OutOfRange,
}

/// Moves `start` by exactly 86 400 seconds.
///
/// # Errors
///
/// Returns `ShiftError::OutOfRange` if the result overflows chrono or falls
/// outside years 0000 to 9999.
pub fn shift_instant(
    start: DateTime<Utc>,
    direction: ShiftDirection,
) -> Result<DateTime<Utc>, ShiftError> {
    let day = Duration::days(1);
    let shifted = match direction {
        ShiftDirection::Add => start.checked_add_signed(day),
        ShiftDirection::Remove => start.checked_sub_signed(day),
    };
    shifted
        .filter(|s| (0..=9999).contains(&s.year()))
        .ok_or(ShiftError::OutOfRange)
}

/// Returns `start_date` moved by exactly 86 400 seconds, in wire format.
///
/// # Errors
///
/// Returns `ShiftError::Malformed` if `start_date` does not parse and
/// `ShiftError::OutOfRange` if the result cannot be written back.
pub fn shift_start_date(
    start_date: &str,
    direction: ShiftDirection,
) -> Result<String, ShiftError> {
    let start = parse_timestamp(start_date)?;
    shift_instant(start, direction).map(format_timestamp)
}
