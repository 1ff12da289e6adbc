//! User error types.

use atrium_shared::AppError;
use atrium_shared::types::UserId;
use thiserror::Error;
use validator::ValidationErrors;

use crate::auth::PasswordError;
use crate::avatar::AvatarError;
use crate::notification::NotificationError;
use crate::repository::RepositoryError;

/// User operation errors.
#[derive(Debug, Error)]
pub enum UserError {
    /// Request fields failed validation.
    #[error("{0}")]
    Validation(String),

    /// User not found.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Another account already uses the email.
    #[error("email already registered: {0}")]
    EmailTaken(String),

    /// Password hashing failed.
    #[error(transparent)]
    Hashing(#[from] PasswordError),

    /// Avatar attachment failed.
    #[error(transparent)]
    Avatar(#[from] AvatarError),

    /// Notification could not be sent.
    #[error(transparent)]
    Notification(#[from] NotificationError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<ValidationErrors> for UserError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| format!("{field} is invalid"), ToString::to_string)
                })
            })
            .collect();
        messages.sort();
        Self::Validation(messages.join("; "))
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(msg) => Self::Validation(msg),
            UserError::NotFound(id) => Self::NotFound(format!("user {id}")),
            UserError::EmailTaken(_) => Self::Conflict(err.to_string()),
            UserError::Hashing(e) => Self::Internal(e.to_string()),
            UserError::Avatar(e) => e.into(),
            UserError::Notification(e) => Self::ExternalService(e.to_string()),
            UserError::Repository(e) => Self::Database(e.to_string()),
        }
    }
}
