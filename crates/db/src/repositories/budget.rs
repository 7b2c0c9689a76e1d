//! Budget repository for budget database operations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use tally_core::budget::Budget;
use tally_core::store::{BudgetStore, StoreError};
use tally_shared::types::{BudgetId, UserId};

use super::store_error;
use crate::entities::budgets;

/// Budget repository backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<budgets::Model> for Budget {
    fn from(model: budgets::Model) -> Self {
        Self {
            id: BudgetId::from_uuid(model.id),
            user_id: UserId::from_uuid(model.user_id),
            name: model.name,
            limit: model.limit,
            period_limit: model.period_limit,
            start_date: model.start_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl BudgetStore for BudgetRepository {
    async fn create_budget(&self, budget: Budget) -> Result<Budget, StoreError> {
        let model = budgets::ActiveModel {
            id: Set(budget.id.into_inner()),
            user_id: Set(budget.user_id.into_inner()),
            name: Set(budget.name),
            limit: Set(budget.limit),
            period_limit: Set(budget.period_limit),
            start_date: Set(budget.start_date),
            created_at: Set(budget.created_at),
            updated_at: Set(budget.updated_at),
        };

        model
            .insert(&self.db)
            .await
            .map(Budget::from)
            .map_err(store_error)
    }

    async fn budgets_for_user(&self, user_id: UserId) -> Result<Vec<Budget>, StoreError> {
        budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id.into_inner()))
            .order_by_asc(budgets::Column::Id)
            .all(&self.db)
            .await
            .map(|rows| rows.into_iter().map(Budget::from).collect())
            .map_err(store_error)
    }

    async fn find_budget(
        &self,
        user_id: UserId,
        budget_id: BudgetId,
    ) -> Result<Option<Budget>, StoreError> {
        budgets::Entity::find_by_id(budget_id.into_inner())
            .filter(budgets::Column::UserId.eq(user_id.into_inner()))
            .one(&self.db)
            .await
            .map(|found| found.map(Budget::from))
            .map_err(store_error)
    }

    async fn update_budget(&self, budget: &Budget) -> Result<(), StoreError> {
        budgets::Entity::update_many()
            .col_expr(budgets::Column::Name, Expr::value(budget.name.clone()))
            .col_expr(budgets::Column::Limit, Expr::value(budget.limit))
            .col_expr(budgets::Column::PeriodLimit, Expr::value(budget.period_limit))
            .col_expr(budgets::Column::StartDate, Expr::value(budget.start_date.clone()))
            .col_expr(budgets::Column::UpdatedAt, Expr::value(budget.updated_at.clone()))
            .filter(budgets::Column::Id.eq(budget.id.into_inner()))
            .filter(budgets::Column::UserId.eq(budget.user_id.into_inner()))
            .exec(&self.db)
            .await
            .map(|_| ())
            .map_err(store_error)
    }

    async fn persist_start_date(
        &self,
        budget_id: BudgetId,
        start_date: &str,
        updated_at: &str,
    ) -> Result<(), StoreError> {
        budgets::Entity::update_many()
            .col_expr(budgets::Column::StartDate, Expr::value(start_date))
            .col_expr(budgets::Column::UpdatedAt, Expr::value(updated_at))
            .filter(budgets::Column::Id.eq(budget_id.into_inner()))
            .exec(&self.db)
            .await
            .map(|_| ())
            .map_err(store_error)
    }

    async fn delete_budget(
        &self,
        user_id: UserId,
        budget_id: BudgetId,
    ) -> Result<bool, StoreError> {
        // spends go with it via ON DELETE CASCADE
        budgets::Entity::delete_many()
            .filter(budgets::Column::Id.eq(budget_id.into_inner()))
            .filter(budgets::Column::UserId.eq(user_id.into_inner()))
            .exec(&self.db)
            .await
            .map(|result| result.rows_affected > 0)
            .map_err(store_error)
    }
}
