//! Wire timestamp codec.
//!
//! Budgets and entries persist their instants as strings shaped like
//! `2024-03-05T00:00:00.0Z`: UTC, one fractional-second digit, trailing `Z`.
//! Parsing accepts any number of fractional digits (including none) so that
//! rows written by other clients still load; formatting always emits exactly one.
//! Everything else about the layout is fixed width.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

const PARSE_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";
const SECONDS_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S";

/// A stored timestamp did not match the wire layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed timestamp `{value}`: expected YYYY-MM-DDTHH:MM:SS.fZ")]
pub struct TimestampError {
    /// The offending input.
    pub value: String,
}

/// Parses a wire timestamp into a UTC instant.
///
/// # Errors
///
/// Returns `TimestampError` if the value does not match the layout.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, TimestampError> {
    if !has_wire_shape(value) {
        return Err(TimestampError {
            value: value.to_string(),
        });
    }
    NaiveDateTime::parse_from_str(value, PARSE_LAYOUT)
        .map(|naive| naive.and_utc())
        .map_err(|_| TimestampError {
            value: value.to_string(),
        })
}

/// Checks the fixed-width layout before chrono, which tolerates signs and padding:
/// a four-digit unsigned year, zero-padded two-digit fields, and either a bare
/// `Z` or a `.` and at least one digit ahead of the `Z`.
fn has_wire_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() < 20 {
        return false;
    }
    let (head, tail) = bytes.split_at(19);
    let head_ok = head.iter().enumerate().all(|(i, &b)| match i {
        4 | 7 => b == b'-',
        10 => b == b'T',
        13 | 16 => b == b':',
        _ => b.is_ascii_digit(),
    });
    let tail_ok = match tail {
        [b'Z'] => true,
        [b'.', digits @ .., b'Z'] => !digits.is_empty() && digits.iter().all(u8::is_ascii_digit),
        _ => false,
    };
    head_ok && tail_ok
}

/// Formats a UTC instant with exactly one fractional-second digit.
///
/// Sub-tenth precision is truncated.
#[must_use]
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    // leap seconds report up to 1999 ms
    let tenths = (instant.timestamp_subsec_millis() / 100).min(9);
    format!("{}.{tenths}Z", instant.format(SECONDS_LAYOUT))
}
