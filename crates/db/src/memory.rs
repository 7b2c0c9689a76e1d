//! In-process stores.
//!
//! Used by the API tests and by `TALLY__DATABASE__URL=memory` dev runs.
//! Everything lives behind one `RwLock`, so each call sees a consistent view.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tally_core::auth::{Session, User};
use tally_core::budget::{Budget, Entry};
use tally_core::store::{BudgetStore, EntryStore, SessionStore, StoreError, UserStore};
use tally_shared::types::{BudgetId, EntryId, SessionId, UserId};
use tokio::sync::RwLock;

use crate::repositories::SessionRepository;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    budgets: BTreeMap<BudgetId, Budget>,
    entries: HashMap<EntryId, Entry>,
    sessions: HashMap<SessionId, Session>,
}

/// Implements every store trait over in-memory maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: User) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict(format!(
                "username `{}` is taken",
                user.username
            )));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }
}

#[async_trait]
impl BudgetStore for MemoryStore {
    async fn create_budget(&self, budget: Budget) -> Result<Budget, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.budgets.contains_key(&budget.id) {
            return Err(StoreError::Conflict(format!("budget {} exists", budget.id)));
        }
        tables.budgets.insert(budget.id, budget.clone());
        Ok(budget)
    }

    async fn budgets_for_user(&self, user_id: UserId) -> Result<Vec<Budget>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .budgets
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_budget(
        &self,
        user_id: UserId,
        budget_id: BudgetId,
    ) -> Result<Option<Budget>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .budgets
            .get(&budget_id)
            .filter(|b| b.user_id == user_id)
            .cloned())
    }

    async fn update_budget(&self, budget: &Budget) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(stored) = tables
            .budgets
            .get_mut(&budget.id)
            .filter(|b| b.user_id == budget.user_id)
        {
            stored.name.clone_from(&budget.name);
            stored.limit = budget.limit;
            stored.period_limit = budget.period_limit;
            stored.start_date.clone_from(&budget.start_date);
            stored.updated_at.clone_from(&budget.updated_at);
        }
        Ok(())
    }

    async fn persist_start_date(
        &self,
        budget_id: BudgetId,
        start_date: &str,
        updated_at: &str,
    ) -> Result<(), StoreError> {
        if let Some(stored) = self.tables.write().await.budgets.get_mut(&budget_id) {
            stored.start_date = start_date.to_string();
            stored.updated_at = updated_at.to_string();
        }
        Ok(())
    }

    async fn delete_budget(
        &self,
        user_id: UserId,
        budget_id: BudgetId,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .budgets
            .get(&budget_id)
            .is_some_and(|b| b.user_id == user_id);
        if !owned {
            return Ok(false);
        }
        tables.budgets.remove(&budget_id);
        tables.entries.retain(|_, e| e.budget_id != budget_id);
        Ok(true)
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    async fn entries_for_budget(&self, budget_id: BudgetId) -> Result<Vec<Entry>, StoreError> {
        let mut entries: Vec<Entry> = self
            .tables
            .read()
            .await
            .entries
            .values()
            .filter(|e| e.budget_id == budget_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(entries)
    }

    async fn find_entry(
        &self,
        user_id: UserId,
        budget_id: BudgetId,
        entry_id: EntryId,
    ) -> Result<Option<Entry>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .entries
            .get(&entry_id)
            .filter(|e| e.budget_id == budget_id && e.user_id == user_id)
            .cloned())
    }

    async fn create_entry(&self, entry: Entry) -> Result<Entry, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.budgets.contains_key(&entry.budget_id) {
            return Err(StoreError::Backend(format!(
                "budget {} does not exist",
                entry.budget_id
            )));
        }
        tables.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn update_entry(&self, entry: &Entry) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(stored) = tables
            .entries
            .get_mut(&entry.id)
            .filter(|e| e.user_id == entry.user_id)
        {
            stored.cost = entry.cost;
            stored.category.clone_from(&entry.category);
            stored.is_credit = entry.is_credit;
            stored.description.clone_from(&entry.description);
            stored.date.clone_from(&entry.date);
            stored.repeat.clone_from(&entry.repeat);
            stored.updated_at.clone_from(&entry.updated_at);
        }
        Ok(())
    }

    async fn delete_entry(
        &self,
        user_id: UserId,
        budget_id: BudgetId,
        entry_id: EntryId,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let matches = tables
            .entries
            .get(&entry_id)
            .is_some_and(|e| e.budget_id == budget_id && e.user_id == user_id);
        if matches {
            tables.entries.remove(&entry_id);
        }
        Ok(matches)
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create_session(
        &self,
        user_id: UserId,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Session, StoreError> {
        let session = Session {
            id: SessionId::new(),
            user_id,
            token_hash: SessionRepository::hash_token(refresh_token),
            expires_at,
            revoked_at: None,
            created_at: now,
        };
        let mut tables = self.tables.write().await;
        // Dead sessions are never looked up again.
        tables.sessions.retain(|_, s| s.is_active(now));
        tables.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_active(
        &self,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, StoreError> {
        let token_hash = SessionRepository::hash_token(refresh_token);
        Ok(self
            .tables
            .read()
            .await
            .sessions
            .values()
            .find(|s| s.token_hash == token_hash && s.is_active(now))
            .cloned())
    }

    async fn revoke(&self, session_id: SessionId, now: DateTime<Utc>) -> Result<(), StoreError> {
        if let Some(session) = self.tables.write().await.sessions.get_mut(&session_id) {
            session.revoked_at.get_or_insert(now);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn budget(user_id: UserId) -> Budget {
        Budget {
            id: BudgetId::new(),
            user_id,
            name: "Food".to_string(),
            limit: 35000,
            period_limit: 5000,
            start_date: "2024-03-01T00:00:00.0Z".to_string(),
            created_at: "2024-03-01T00:00:00.0Z".to_string(),
            updated_at: "2024-03-01T00:00:00.0Z".to_string(),
        }
    }

    fn entry(b: &Budget, created_at: &str) -> Entry {
        Entry {
            id: EntryId::new(),
            budget_id: b.id,
            user_id: b.user_id,
            cost: -100,
            category: "misc".to_string(),
            is_credit: false,
            description: None,
            date: None,
            repeat: None,
            created_at: created_at.to_string(),
            updated_at: created_at.to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store
            .create_user(User::new("alice", "h".into(), now))
            .await
            .unwrap();

        let result = store.create_user(User::new("alice", "h".into(), now)).await;

        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_budgets_are_scoped_to_owner() {
        let store = MemoryStore::new();
        let (alice, bob) = (UserId::new(), UserId::new());
        let b = store.create_budget(budget(alice)).await.unwrap();

        assert!(store.find_budget(alice, b.id).await.unwrap().is_some());
        assert!(store.find_budget(bob, b.id).await.unwrap().is_none());
        assert!(store.budgets_for_user(bob).await.unwrap().is_empty());
        assert!(!store.delete_budget(bob, b.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_entries_ordered_by_created_at_then_id() {
        let store = MemoryStore::new();
        let b = store.create_budget(budget(UserId::new())).await.unwrap();
        let late = store
            .create_entry(entry(&b, "2024-03-02T00:00:00.0Z"))
            .await
            .unwrap();
        let early = store
            .create_entry(entry(&b, "2024-03-01T00:00:00.0Z"))
            .await
            .unwrap();

        let ids: Vec<EntryId> = store
            .entries_for_budget(b.id)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();

        assert_eq!(ids, vec![early.id, late.id]);
    }

    #[tokio::test]
    async fn test_delete_budget_removes_entries() {
        let store = MemoryStore::new();
        let b = store.create_budget(budget(UserId::new())).await.unwrap();
        store
            .create_entry(entry(&b, "2024-03-01T00:00:00.0Z"))
            .await
            .unwrap();

        assert!(store.delete_budget(b.user_id, b.id).await.unwrap());
        assert!(store.entries_for_budget(b.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persist_start_date() {
        let store = MemoryStore::new();
        let b = store.create_budget(budget(UserId::new())).await.unwrap();

        store
            .persist_start_date(b.id, "2024-03-02T00:00:00.0Z", "2024-03-05T00:00:00.0Z")
            .await
            .unwrap();

        let stored = store.find_budget(b.user_id, b.id).await.unwrap().unwrap();
        assert_eq!(stored.start_date, "2024-03-02T00:00:00.0Z");
        assert_eq!(stored.updated_at, "2024-03-05T00:00:00.0Z");
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let user_id = UserId::new();
        let session = store
            .create_session(user_id, "token", now + Duration::days(7), now)
            .await
            .unwrap();

        assert_eq!(
            store.find_active("token", now).await.unwrap().map(|s| s.id),
            Some(session.id)
        );
        assert!(store.find_active("other", now).await.unwrap().is_none());
        assert!(
            store
                .find_active("token", now + Duration::days(8))
                .await
                .unwrap()
                .is_none()
        );

        store.revoke(session.id, now).await.unwrap();
        assert!(store.find_active("token", now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_new_session_prunes_dead_ones() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let user_id = UserId::new();
        store
            .create_session(user_id, "expiring", now + Duration::hours(1), now)
            .await
            .unwrap();
        let revoked = store
            .create_session(user_id, "revoked", now + Duration::days(7), now)
            .await
            .unwrap();
        let live = store
            .create_session(user_id, "live", now + Duration::days(7), now)
            .await
            .unwrap();
        store.revoke(revoked.id, now).await.unwrap();
        assert_eq!(store.tables.read().await.sessions.len(), 3);

        let later = now + Duration::hours(2);
        let fresh = store
            .create_session(user_id, "fresh", later + Duration::days(7), later)
            .await
            .unwrap();

        let tables = store.tables.read().await;
        assert_eq!(tables.sessions.len(), 2);
        assert!(tables.sessions.contains_key(&live.id));
        assert!(tables.sessions.contains_key(&fresh.id));
    }
}
