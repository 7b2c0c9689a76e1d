//! Session repository for database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use sha2::{Digest, Sha256};
use tally_core::auth::Session;
use tally_core::store::{SessionStore, StoreError};
use tally_shared::types::{SessionId, UserId};

use super::store_error;
use crate::entities::sessions;

/// Session repository backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    db: DatabaseConnection,
}

impl SessionRepository {
    /// Creates a new session repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Hashes a refresh token for storage.
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl From<sessions::Model> for Session {
    fn from(model: sessions::Model) -> Self {
        Self {
            id: SessionId::from_uuid(model.id),
            user_id: UserId::from_uuid(model.user_id),
            token_hash: model.refresh_token_hash,
            expires_at: model.expires_at.with_timezone(&Utc),
            revoked_at: model.revoked_at.map(|at| at.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn create_session(
        &self,
        user_id: UserId,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Session, StoreError> {
        let session = sessions::ActiveModel {
            id: Set(SessionId::new().into_inner()),
            user_id: Set(user_id.into_inner()),
            refresh_token_hash: Set(Self::hash_token(refresh_token)),
            expires_at: Set(expires_at.into()),
            revoked_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        session
            .insert(&self.db)
            .await
            .map(Session::from)
            .map_err(store_error)
    }

    async fn find_active(
        &self,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, StoreError> {
        sessions::Entity::find()
            .filter(sessions::Column::RefreshTokenHash.eq(Self::hash_token(refresh_token)))
            .filter(sessions::Column::RevokedAt.is_null())
            .filter(sessions::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await
            .map(|found| found.map(Session::from))
            .map_err(store_error)
    }

    async fn revoke(&self, session_id: SessionId, now: DateTime<Utc>) -> Result<(), StoreError> {
        sessions::Entity::update_many()
            .col_expr(
                sessions::Column::RevokedAt,
                sea_orm::sea_query::Expr::value(now),
            )
            .col_expr(
                sessions::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(now),
            )
            .filter(sessions::Column::Id.eq(session_id.into_inner()))
            .filter(sessions::Column::RevokedAt.is_null())
            .exec(&self.db)
            .await
            .map(|_| ())
            .map_err(store_error)
    }
}
