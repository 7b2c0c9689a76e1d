//! Budget data types.

use serde::{Deserialize, Serialize};
use tally_shared::types::{BudgetId, EntryId, UserId};

/// A budget record.
///
/// Timestamps are kept in their wire form so a corrupt stored value is
/// surfaced by the projection engine instead of being lost at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Owning user.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Spending ceiling for the whole period, in minor units.
    pub limit: i64,
    /// Allowance per elapsed day, in minor units.
    pub period_limit: i64,
    /// Instant the budget period began.
    pub start_date: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// A spend or income entry recorded against a budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Entry ID.
    pub id: EntryId,
    /// Parent budget.
    pub budget_id: BudgetId,
    /// Owning user.
    pub user_id: UserId,
    /// Signed amount: negative is an expense, positive is income.
    pub cost: i64,
    /// Free-text category label.
    pub category: String,
    /// Deferred entry tracked apart from cash movements.
    pub is_credit: bool,
    /// Optional description.
    pub description: Option<String>,
    /// Planned date. Present only for entries that have not happened yet.
    pub date: Option<String>,
    /// Opaque recurrence descriptor, stored and echoed only.
    pub repeat: Option<String>,
    /// Creation timestamp, the realization instant of an unplanned entry.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl Entry {
    /// Returns true if the entry carries a planned date.
    #[must_use]
    pub const fn is_planned(&self) -> bool {
        self.date.is_some()
    }
}

/// Input for creating a budget.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    /// Display name.
    pub name: String,
    /// Spending ceiling.
    pub limit: i64,
    /// Allowance per day.
    pub period_limit: i64,
    /// Explicit start date; defaults to the creation instant.
    #[serde(default)]
    pub start_date: Option<String>,
}

/// Partial update of a budget. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPatch {
    /// New name.
    pub name: Option<String>,
    /// New spending ceiling.
    pub limit: Option<i64>,
    /// New allowance per day.
    pub period_limit: Option<i64>,
    /// New start date.
    pub start_date: Option<String>,
}

/// Input for recording an entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    /// Signed amount.
    pub cost: i64,
    /// Category label.
    pub category: String,
    /// Credit flag.
    #[serde(default)]
    pub is_credit: bool,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Planned date.
    #[serde(default)]
    pub date: Option<String>,
    /// Recurrence descriptor.
    #[serde(default)]
    pub repeat: Option<String>,
}

/// Partial update of an entry.
///
/// Nullable fields use a nested option: `Some(None)` clears the value,
/// `None` leaves it unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPatch {
    /// New amount.
    pub cost: Option<i64>,
    /// New category.
    pub category: Option<String>,
    /// New credit flag.
    pub is_credit: Option<bool>,
    /// New description.
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    /// New planned date. Clearing it marks the entry as realized.
    #[serde(default, deserialize_with = "nullable")]
    pub date: Option<Option<String>>,
    /// New recurrence descriptor.
    #[serde(default, deserialize_with = "nullable")]
    pub repeat: Option<Option<String>>,
}

fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
