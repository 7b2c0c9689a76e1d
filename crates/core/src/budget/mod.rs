//! Budgets and the entries recorded against them.

pub mod error;
pub mod service;
pub mod types;

pub use error::BudgetError;
pub use service::BudgetService;
pub use types::{Budget, BudgetPatch, Entry, EntryPatch, NewBudget, NewEntry};
