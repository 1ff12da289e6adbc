//! User repository for database operations.

use async_trait::async_trait;
use atrium_core::repository::RepositoryError;
use atrium_core::user::{
    CreateUserRecord, User, UserChanges, UserRepository as UserRepoTrait,
};
use atrium_shared::types::{AvatarId, UserId};
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::map_db_err;
use crate::entities::users;

/// User repository for CRUD operations.
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

#[async_trait]
impl UserRepoTrait for UserRepository {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let model = users::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.map(to_domain))
    }

    async fn create(&self, record: CreateUserRecord) -> Result<User, RepositoryError> {
        let now = now();
        let user = users::ActiveModel {
            id: Set(record.id.into_inner()),
            name: Set(record.name),
            email: Set(record.email),
            password_hash: Set(record.password_hash),
            age: Set(record.age),
            avatar_ids: Set(Vec::new()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = user.insert(&self.db).await.map_err(map_db_err)?;
        Ok(to_domain(model))
    }

    async fn update(
        &self,
        id: UserId,
        changes: UserChanges,
    ) -> Result<Option<User>, RepositoryError> {
        // Only the named columns are written, so a concurrent avatar append
        // is never overwritten.
        let mut update = users::Entity::update_many()
            .col_expr(users::Column::UpdatedAt, Expr::value(now()))
            .filter(users::Column::Id.eq(id.into_inner()));

        if let Some(name) = changes.name {
            update = update.col_expr(users::Column::Name, Expr::value(name));
        }
        if let Some(email) = changes.email {
            update = update.col_expr(users::Column::Email, Expr::value(email));
        }
        if let Some(hash) = changes.password_hash {
            update = update.col_expr(users::Column::PasswordHash, Expr::value(hash));
        }
        if let Some(age) = changes.age {
            update = update.col_expr(users::Column::Age, Expr::value(age));
        }

        let updated = update
            .exec_with_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(updated.into_iter().next().map(to_domain))
    }

    async fn delete(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let Some(model) = users::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await
            .map_err(map_db_err)?
        else {
            txn.rollback().await.map_err(map_db_err)?;
            return Ok(None);
        };

        users::Entity::delete_by_id(model.id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(Some(to_domain(model)))
    }
}

fn now() -> DateTime<FixedOffset> {
    Utc::now().fixed_offset()
}

/// Convert database model to domain user.
fn to_domain(model: users::Model) -> User {
    User {
        id: UserId::from_uuid(model.id),
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        age: model.age,
        avatar_ids: model.avatar_ids.into_iter().map(AvatarId::from_uuid).collect(),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
