//! Budget error types.

use tally_shared::types::TimestampError;
use thiserror::Error;

/// Budget and entry validation errors.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// Budget name is empty.
    #[error("Budget name must not be empty")]
    EmptyName,

    /// Spending ceiling is zero.
    #[error("Budget limit must not be zero")]
    ZeroLimit,

    /// Daily allowance is zero.
    #[error("Budget periodLimit must not be zero")]
    ZeroPeriodLimit,

    /// A supplied date does not match the wire format.
    #[error(transparent)]
    InvalidTimestamp(#[from] TimestampError),
}
