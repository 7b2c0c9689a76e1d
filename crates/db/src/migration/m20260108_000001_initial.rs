//! Initial database migration.
//!
//! Creates the users, budgets and spends tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(BUDGETS_SQL).await?;
        db.execute_unprepared(SPENDS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS spends CASCADE;
             DROP TABLE IF EXISTS budgets CASCADE;
             DROP TABLE IF EXISTS users CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    username VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    role VARCHAR(32) NOT NULL DEFAULT 'user',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_username_not_empty CHECK (length(trim(username)) > 0)
);
";

// Timestamps stay in their wire text form: `YYYY-MM-DDTHH:MM:SS.fZ`.
const BUDGETS_SQL: &str = r"
CREATE TABLE budgets (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    spend_limit BIGINT NOT NULL,
    period_limit BIGINT NOT NULL,
    start_date VARCHAR(32) NOT NULL,
    created_at VARCHAR(32) NOT NULL,
    updated_at VARCHAR(32) NOT NULL
);

CREATE INDEX idx_budgets_user ON budgets(user_id, id);
";

const SPENDS_SQL: &str = r"
CREATE TABLE spends (
    id UUID PRIMARY KEY,
    budget_id UUID NOT NULL REFERENCES budgets(id) ON DELETE CASCADE,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    cost BIGINT NOT NULL,
    category VARCHAR(255) NOT NULL,
    is_credit BOOLEAN NOT NULL DEFAULT false,
    description TEXT,
    date VARCHAR(32),
    repeat_rule VARCHAR(255),
    created_at VARCHAR(32) NOT NULL,
    updated_at VARCHAR(32) NOT NULL
);

CREATE INDEX idx_spends_budget ON spends(budget_id, created_at, id);
";
