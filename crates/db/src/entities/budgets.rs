//! `SeaORM` Entity for budgets table.
//!
//! Timestamps are stored as wire-format text, not `TIMESTAMPTZ`.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[sea_orm(column_name = "spend_limit")]
    pub limit: i64,
    pub period_limit: i64,
    pub start_date: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::spends::Entity")]
    Spends,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::spends::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Spends.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
