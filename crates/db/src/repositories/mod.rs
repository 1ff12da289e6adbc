//! Repository implementations of the core persistence traits.

mod avatar;
mod user;

pub use avatar::AvatarRepository;
pub use user::UserRepository;

use atrium_core::repository::RepositoryError;
use sea_orm::{DbErr, SqlErr};

/// Map a `SeaORM` error onto the repository error vocabulary.
pub(crate) fn map_db_err(err: DbErr) -> RepositoryError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => RepositoryError::Conflict(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => RepositoryError::NotFound,
        _ => match err {
            DbErr::RecordNotFound(_) => RepositoryError::NotFound,
            other => RepositoryError::database(other),
        },
    }
}
