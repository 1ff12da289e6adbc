//! Avatar repository for database operations.
//!
//! Creating an avatar and appending it to the owner's list happen in one
//! transaction.

use async_trait::async_trait;
use atrium_core::avatar::{Avatar, AvatarRepository as AvatarRepoTrait, NewAvatar};
use atrium_core::repository::RepositoryError;
use atrium_shared::types::{AvatarId, UserId};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbBackend, Set, Statement,
    TransactionTrait,
};
use tracing::debug;

use super::map_db_err;
use crate::entities::avatars;

const APPEND_AVATAR_SQL: &str = r"
UPDATE users
SET avatar_ids = array_append(avatar_ids, $1), updated_at = now()
WHERE id = $2";

/// Avatar repository implementation.
#[derive(Debug, Clone)]
pub struct AvatarRepository {
    db: DatabaseConnection,
}

impl AvatarRepository {
    /// Create a new avatar repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AvatarRepoTrait for AvatarRepository {
    async fn create_and_link(&self, avatar: NewAvatar) -> Result<Avatar, RepositoryError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        // Locks the owner row until commit.
        let appended = txn
            .execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                APPEND_AVATAR_SQL,
                [
                    avatar.id.into_inner().into(),
                    avatar.user_id.into_inner().into(),
                ],
            ))
            .await
            .map_err(map_db_err)?;

        if appended.rows_affected() == 0 {
            txn.rollback().await.map_err(map_db_err)?;
            debug!(user_id = %avatar.user_id, "Owner missing, avatar not linked");
            return Err(RepositoryError::NotFound);
        }

        let model = avatars::ActiveModel {
            id: Set(avatar.id.into_inner()),
            url: Set(avatar.url),
            is_active: Set(avatar.is_active),
            user_id: Set(avatar.user_id.into_inner()),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;

        Ok(to_domain(model))
    }

}

/// Convert database model to domain avatar.
fn to_domain(model: avatars::Model) -> Avatar {
    Avatar {
        id: AvatarId::from_uuid(model.id),
        url: model.url,
        is_active: model.is_active,
        user_id: UserId::from_uuid(model.user_id),
        created_at: model.created_at.with_timezone(&Utc),
    }
}
