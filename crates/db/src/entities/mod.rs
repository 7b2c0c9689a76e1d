//! `SeaORM` entity definitions.

pub mod budgets;
pub mod sessions;
pub mod spends;
pub mod users;
