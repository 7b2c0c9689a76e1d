//! User repository for database operations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tally_core::auth::User;
use tally_core::store::{StoreError, UserStore};
use tally_shared::types::UserId;

use super::store_error;
use crate::entities::users;

/// User repository backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: UserId::from_uuid(model.id),
            username: model.username,
            password_hash: model.password_hash,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create_user(&self, user: User) -> Result<User, StoreError> {
        let model = users::ActiveModel {
            id: Set(user.id.into_inner()),
            username: Set(user.username),
            password_hash: Set(user.password_hash),
            role: Set(user.role),
            created_at: Set(user.created_at.into()),
            updated_at: Set(user.updated_at.into()),
        };

        model
            .insert(&self.db)
            .await
            .map(User::from)
            .map_err(store_error)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map(|found| found.map(User::from))
            .map_err(store_error)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        users::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map(|found| found.map(User::from))
            .map_err(store_error)
    }
}
