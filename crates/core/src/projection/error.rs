//! Projection error types.

use tally_shared::types::TimestampError;
use thiserror::Error;

/// Errors that abort a single budget projection.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The start date or a realized entry's creation time does not parse.
    #[error(transparent)]
    MalformedTimestamp(#[from] TimestampError),

    /// `periodLimit` is zero, so the daily figures are undefined.
    #[error("periodLimit is zero; daily figures are undefined")]
    DivisionPrecondition,

    /// An aggregate does not fit in 64 bits.
    #[error("projection overflowed while computing {0}")]
    Overflow(&'static str),
}
