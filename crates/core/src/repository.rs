//! Errors shared by the persistence ports.

use thiserror::Error;

/// Failure reported by a repository implementation.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The targeted row does not exist.
    #[error("record not found")]
    NotFound,

    /// A unique constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Any other storage engine failure.
    #[error("database error: {0}")]
    Database(String),
}

impl RepositoryError {
    /// Create a database error.
    #[must_use]
    pub fn database(msg: impl ToString) -> Self {
        Self::Database(msg.to_string())
    }
}
