//! Entry repository for the spends table.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tally_core::budget::Entry;
use tally_core::store::{EntryStore, StoreError};
use tally_shared::types::{BudgetId, EntryId, UserId};

use super::store_error;
use crate::entities::spends;

/// Entry repository backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct EntryRepository {
    db: DatabaseConnection,
}

impl EntryRepository {
    /// Creates a new entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<spends::Model> for Entry {
    fn from(model: spends::Model) -> Self {
        Self {
            id: EntryId::from_uuid(model.id),
            budget_id: BudgetId::from_uuid(model.budget_id),
            user_id: UserId::from_uuid(model.user_id),
            cost: model.cost,
            category: model.category,
            is_credit: model.is_credit,
            description: model.description,
            date: model.date,
            repeat: model.repeat,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn active_model(entry: Entry) -> spends::ActiveModel {
    spends::ActiveModel {
        id: Set(entry.id.into_inner()),
        budget_id: Set(entry.budget_id.into_inner()),
        user_id: Set(entry.user_id.into_inner()),
        cost: Set(entry.cost),
        category: Set(entry.category),
        is_credit: Set(entry.is_credit),
        description: Set(entry.description),
        date: Set(entry.date),
        repeat: Set(entry.repeat),
        created_at: Set(entry.created_at),
        updated_at: Set(entry.updated_at),
    }
}

#[async_trait]
impl EntryStore for EntryRepository {
    async fn entries_for_budget(&self, budget_id: BudgetId) -> Result<Vec<Entry>, StoreError> {
        spends::Entity::find()
            .filter(spends::Column::BudgetId.eq(budget_id.into_inner()))
            .order_by_asc(spends::Column::CreatedAt)
            .order_by_asc(spends::Column::Id)
            .all(&self.db)
            .await
            .map(|rows| rows.into_iter().map(Entry::from).collect())
            .map_err(store_error)
    }

    async fn find_entry(
        &self,
        user_id: UserId,
        budget_id: BudgetId,
        entry_id: EntryId,
    ) -> Result<Option<Entry>, StoreError> {
        spends::Entity::find_by_id(entry_id.into_inner())
            .filter(spends::Column::BudgetId.eq(budget_id.into_inner()))
            .filter(spends::Column::UserId.eq(user_id.into_inner()))
            .one(&self.db)
            .await
            .map(|found| found.map(Entry::from))
            .map_err(store_error)
    }

    async fn create_entry(&self, entry: Entry) -> Result<Entry, StoreError> {
        active_model(entry)
            .insert(&self.db)
            .await
            .map(Entry::from)
            .map_err(store_error)
    }

    async fn update_entry(&self, entry: &Entry) -> Result<(), StoreError> {
        let mut model = active_model(entry.clone());
        // immutable after insert
        model.budget_id = sea_orm::ActiveValue::NotSet;
        model.user_id = sea_orm::ActiveValue::NotSet;
        model.created_at = sea_orm::ActiveValue::NotSet;

        spends::Entity::update(model)
            .filter(spends::Column::UserId.eq(entry.user_id.into_inner()))
            .exec(&self.db)
            .await
            .map(|_| ())
            .map_err(store_error)
    }

    async fn delete_entry(
        &self,
        user_id: UserId,
        budget_id: BudgetId,
        entry_id: EntryId,
    ) -> Result<bool, StoreError> {
        spends::Entity::delete_many()
            .filter(spends::Column::Id.eq(entry_id.into_inner()))
            .filter(spends::Column::BudgetId.eq(budget_id.into_inner()))
            .filter(spends::Column::UserId.eq(user_id.into_inner()))
            .exec(&self.db)
            .await
            .map(|result| result.rows_affected > 0)
            .map_err(store_error)
    }
}
