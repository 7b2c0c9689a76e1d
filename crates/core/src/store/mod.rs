//! Storage traits.
//!
//! `tally-db` provides a PostgreSQL implementation and an in-memory one.
//! Handlers only see [`Storage`], a bundle of trait objects.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tally_shared::types::{BudgetId, EntryId, SessionId, UserId};
use thiserror::Error;

use crate::auth::{Session, User};
use crate::budget::{Budget, Entry};

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backend failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Account persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user.
    ///
    /// Fails with `StoreError::Conflict` if the username is taken.
    async fn create_user(&self, user: User) -> Result<User, StoreError>;

    /// Looks up a user by login name.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Looks up a user by ID.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;
}

/// Budget persistence. Lookups are scoped to the owning user.
#[async_trait]
pub trait BudgetStore: Send + Sync {
    /// Inserts a budget.
    async fn create_budget(&self, budget: Budget) -> Result<Budget, StoreError>;

    /// Returns every budget owned by `user_id`, in no particular order.
    async fn budgets_for_user(&self, user_id: UserId) -> Result<Vec<Budget>, StoreError>;

    /// Returns the budget if it exists and belongs to `user_id`.
    async fn find_budget(
        &self,
        user_id: UserId,
        budget_id: BudgetId,
    ) -> Result<Option<Budget>, StoreError>;

    /// Overwrites the mutable fields of an existing budget.
    async fn update_budget(&self, budget: &Budget) -> Result<(), StoreError>;

    /// Stores a new start date.
    async fn persist_start_date(
        &self,
        budget_id: BudgetId,
        start_date: &str,
        updated_at: &str,
    ) -> Result<(), StoreError>;

    /// Deletes a budget and its entries. Returns false if nothing matched.
    async fn delete_budget(&self, user_id: UserId, budget_id: BudgetId)
    -> Result<bool, StoreError>;
}

/// Entry persistence.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Returns a budget's entries ordered by `created_at`, then ID.
    async fn entries_for_budget(&self, budget_id: BudgetId) -> Result<Vec<Entry>, StoreError>;

    /// Returns the entry if it belongs to `budget_id` and `user_id`.
    async fn find_entry(
        &self,
        user_id: UserId,
        budget_id: BudgetId,
        entry_id: EntryId,
    ) -> Result<Option<Entry>, StoreError>;

    /// Inserts an entry.
    async fn create_entry(&self, entry: Entry) -> Result<Entry, StoreError>;

    /// Overwrites the mutable fields of an existing entry.
    async fn update_entry(&self, entry: &Entry) -> Result<(), StoreError>;

    /// Deletes an entry. Returns false if nothing matched.
    async fn delete_entry(
        &self,
        user_id: UserId,
        budget_id: BudgetId,
        entry_id: EntryId,
    ) -> Result<bool, StoreError>;
}

/// Refresh-token sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Records a session for `refresh_token`.
    async fn create_session(
        &self,
        user_id: UserId,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Session, StoreError>;

    /// Returns the unrevoked, unexpired session for `refresh_token`.
    async fn find_active(
        &self,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, StoreError>;

    /// Revokes a session.
    async fn revoke(&self, session_id: SessionId, now: DateTime<Utc>) -> Result<(), StoreError>;
}

/// Handles to every store.
#[derive(Clone)]
pub struct Storage {
    /// Accounts.
    pub users: Arc<dyn UserStore>,
    /// Budgets.
    pub budgets: Arc<dyn BudgetStore>,
    /// Entries.
    pub entries: Arc<dyn EntryStore>,
    /// Sessions.
    pub sessions: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}
