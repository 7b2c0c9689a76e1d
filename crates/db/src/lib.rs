//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repositories implementing the `tally_core::store` traits
//! - An in-memory implementation of the same traits
//! - Database migrations

pub mod entities;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use memory::MemoryStore;
pub use repositories::{BudgetRepository, EntryRepository, SessionRepository, UserRepository};

use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tally_core::store::Storage;
use tally_shared::config::DatabaseConfig;

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);
    Database::connect(options).await
}

/// Builds storage backed by PostgreSQL repositories.
#[must_use]
pub fn postgres_storage(db: &DatabaseConnection) -> Storage {
    Storage {
        users: Arc::new(UserRepository::new(db.clone())),
        budgets: Arc::new(BudgetRepository::new(db.clone())),
        entries: Arc::new(EntryRepository::new(db.clone())),
        sessions: Arc::new(SessionRepository::new(db.clone())),
    }
}

/// Builds storage backed by a fresh [`MemoryStore`].
#[must_use]
pub fn memory_storage() -> Storage {
    let store = Arc::new(MemoryStore::new());
    Storage {
        users: store.clone(),
        budgets: store.clone(),
        entries: store.clone(),
        sessions: store,
    }
}
