//! Budget service for record construction and validation.

use chrono::{DateTime, Utc};
use tally_shared::types::{
    BudgetId, EntryId, TimestampError, UserId, format_timestamp, parse_timestamp,
};

use super::error::BudgetError;
use super::types::{Budget, BudgetPatch, Entry, EntryPatch, NewBudget, NewEntry};

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Builds a new budget owned by `user_id`.
    ///
    /// The start date defaults to `now`. A supplied start date is re-emitted
    /// in the canonical wire form.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::EmptyName`, `ZeroLimit` or `ZeroPeriodLimit` for
    /// invalid figures and `InvalidTimestamp` for a malformed start date.
    pub fn create_budget(
        user_id: UserId,
        input: NewBudget,
        now: DateTime<Utc>,
    ) -> Result<Budget, BudgetError> {
        validate_name(&input.name)?;
        validate_limit(input.limit)?;
        validate_period_limit(input.period_limit)?;

        let stamp = format_timestamp(now);
        let start_date = match input.start_date {
            Some(raw) => canonical(&raw)?,
            None => stamp.clone(),
        };

        Ok(Budget {
            id: BudgetId::new(),
            user_id,
            name: input.name.trim().to_string(),
            limit: input.limit,
            period_limit: input.period_limit,
            start_date,
            created_at: stamp.clone(),
            updated_at: stamp,
        })
    }

    /// Applies a partial update. Nothing is changed if any field is invalid.
    ///
    /// # Errors
    ///
    /// Same rules as [`BudgetService::create_budget`] for each present field.
    pub fn apply_patch(
        budget: &mut Budget,
        patch: BudgetPatch,
        now: DateTime<Utc>,
    ) -> Result<(), BudgetError> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        if let Some(limit) = patch.limit {
            validate_limit(limit)?;
        }
        if let Some(period_limit) = patch.period_limit {
            validate_period_limit(period_limit)?;
        }
        let start_date = patch.start_date.as_deref().map(canonical).transpose()?;

        if let Some(name) = patch.name {
            budget.name = name.trim().to_string();
        }
        if let Some(limit) = patch.limit {
            budget.limit = limit;
        }
        if let Some(period_limit) = patch.period_limit {
            budget.period_limit = period_limit;
        }
        if let Some(start_date) = start_date {
            budget.start_date = start_date;
        }
        budget.updated_at = format_timestamp(now);
        Ok(())
    }

    /// Builds a new entry for `budget`.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::InvalidTimestamp` if the planned date is malformed.
    pub fn create_entry(
        budget: &Budget,
        input: NewEntry,
        now: DateTime<Utc>,
    ) -> Result<Entry, BudgetError> {
        let date = input.date.as_deref().map(canonical).transpose()?;
        let stamp = format_timestamp(now);

        Ok(Entry {
            id: EntryId::new(),
            budget_id: budget.id,
            user_id: budget.user_id,
            cost: input.cost,
            category: input.category,
            is_credit: input.is_credit,
            description: input.description,
            date,
            repeat: input.repeat,
            created_at: stamp.clone(),
            updated_at: stamp,
        })
    }

    /// Applies a partial update to an entry.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::InvalidTimestamp` if a new planned date is malformed.
    pub fn apply_entry_patch(
        entry: &mut Entry,
        patch: EntryPatch,
        now: DateTime<Utc>,
    ) -> Result<(), BudgetError> {
        let date = match patch.date {
            Some(Some(raw)) => Some(Some(canonical(&raw)?)),
            other => other,
        };

        if let Some(cost) = patch.cost {
            entry.cost = cost;
        }
        if let Some(category) = patch.category {
            entry.category = category;
        }
        if let Some(is_credit) = patch.is_credit {
            entry.is_credit = is_credit;
        }
        if let Some(description) = patch.description {
            entry.description = description;
        }
        if let Some(date) = date {
            entry.date = date;
        }
        if let Some(repeat) = patch.repeat {
            entry.repeat = repeat;
        }
        entry.updated_at = format_timestamp(now);
        Ok(())
    }
}

fn canonical(raw: &str) -> Result<String, TimestampError> {
    parse_timestamp(raw).map(format_timestamp)
}

fn validate_name(name: &str) -> Result<(), BudgetError> {
    if name.trim().is_empty() {
        return Err(BudgetError::EmptyName);
    }
    Ok(())
}

fn validate_limit(limit: i64) -> Result<(), BudgetError> {
    if limit == 0 {
        return Err(BudgetError::ZeroLimit);
    }
    Ok(())
}

fn validate_period_limit(period_limit: i64) -> Result<(), BudgetError> {
    if period_limit == 0 {
        return Err(BudgetError::ZeroPeriodLimit);
    }
    Ok(())
}
