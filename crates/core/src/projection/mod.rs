//! Budget projection.
//!
//! Turns a budget, its entries and a reference instant into the figures a
//! dashboard shows:
//! - days elapsed and days remaining
//! - today's and this week's allowance
//! - month-to-date spend and income
//! - outstanding credit

pub mod classify;
pub mod engine;
pub mod error;
pub mod types;

#[cfg(test)]
mod props;
#[cfg(test)]
mod tests;

pub use classify::{EntryClass, classify};
pub use engine::{days_passed, project};
pub use error::ProjectionError;
pub use types::{Projection, Totals};
