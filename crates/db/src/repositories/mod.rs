//! Repository abstractions for data access.
//!
//! Each repository implements one of the `tally_core::store` traits on top
//! of `SeaORM`, hiding the database from the rest of the application.

pub mod budget;
pub mod entry;
pub mod session;
pub mod user;

pub use budget::BudgetRepository;
pub use entry::EntryRepository;
pub use session::SessionRepository;
pub use user::UserRepository;

use sea_orm::{DbErr, SqlErr};
use tally_core::store::StoreError;

/// Maps a database error onto the storage taxonomy.
pub(crate) fn store_error(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::Conflict(detail),
        _ => {
            tracing::error!(error = %err, "database operation failed");
            StoreError::Backend(err.to_string())
        }
    }
}
