//! Projection data types.

use serde::Serialize;

use super::classify::EntryClass;
use super::error::ProjectionError;
use crate::budget::{Budget, Entry};

/// Aggregates accumulated over a budget's entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Signed sum of every realized, non-credit entry.
    pub spends_cost: i64,
    /// Sum of negative current-month realized entries.
    pub month_spend: i64,
    /// Sum of positive current-month realized entries.
    pub month_income: i64,
    /// Sum of realized credit entries.
    pub credit: i64,
}

impl Totals {
    /// Adds one classified entry's cost.
    ///
    /// # Errors
    ///
    /// Returns `ProjectionError::Overflow` if a running sum leaves the i64 range.
    pub fn record(&mut self, class: EntryClass, cost: i64) -> Result<(), ProjectionError> {
        match class {
            EntryClass::Planned => {}
            EntryClass::Credit => self.credit = add(self.credit, cost, "credit")?,
            EntryClass::RealizedEarlier => {
                self.spends_cost = add(self.spends_cost, cost, "spendsCost")?;
            }
            EntryClass::RealizedCurrentMonth => {
                self.spends_cost = add(self.spends_cost, cost, "spendsCost")?;
                if cost < 0 {
                    self.month_spend = add(self.month_spend, cost, "monthSpend")?;
                } else {
                    self.month_income = add(self.month_income, cost, "monthIncome")?;
                }
            }
        }
        Ok(())
    }
}

fn add(total: i64, cost: i64, field: &'static str) -> Result<i64, ProjectionError> {
    total.checked_add(cost).ok_or(ProjectionError::Overflow(field))
}

/// The dashboard view of a budget at a reference instant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    /// Static budget fields, echoed verbatim.
    #[serde(flatten)]
    pub budget: Budget,
    /// Days since the start date, the start day being day 1.
    pub days_passed: i64,
    /// Days until `limit` runs out at the daily rate.
    pub days_left: i64,
    /// Cumulative allowance through today.
    pub today_limit: i64,
    /// Remaining ceiling after realized spend and credit.
    pub today_budget: i64,
    /// Allowance through the end of the current ISO week.
    pub week_limit: i64,
    /// Current-month expenses.
    pub month_spend: i64,
    /// Current-month income.
    pub month_income: i64,
    /// Outstanding credit.
    pub credit: i64,
    /// Signed sum of all realized, non-credit entries.
    #[serde(skip)]
    pub spends_cost: i64,
    /// Every entry in input order, planned ones included.
    pub spends: Vec<Entry>,
}
