//! Avatar error types.

use atrium_shared::AppError;
use atrium_shared::types::UserId;
use thiserror::Error;

use crate::repository::RepositoryError;
use crate::storage::StorageError;

/// Avatar attachment errors.
#[derive(Debug, Error)]
pub enum AvatarError {
    /// The uploaded file has no usable name.
    #[error("file name is empty")]
    EmptyFileName,

    /// The category is not a single safe path segment.
    #[error("invalid avatar category: {0:?}")]
    InvalidCategory(String),

    /// The upload exceeds the size limit or has a disallowed type.
    #[error("upload rejected: {0}")]
    Rejected(#[source] StorageError),

    /// Writing the file to storage failed.
    #[error("{}", atrium_shared::error::CANT_UPLOAD_FILE_MESSAGE)]
    UploadFailed(#[source] StorageError),

    /// The owner disappeared before the avatar could be linked.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(#[source] RepositoryError),
}

impl From<AvatarError> for AppError {
    fn from(err: AvatarError) -> Self {
        match err {
            AvatarError::EmptyFileName
            | AvatarError::InvalidCategory(_)
            | AvatarError::Rejected(_) => Self::Validation(err.to_string()),
            AvatarError::UploadFailed(_) => Self::UploadFailed,
            AvatarError::UserNotFound(id) => Self::NotFound(format!("user {id}")),
            AvatarError::Repository(e) => Self::Database(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_failure_maps_to_fixed_code() {
        let app: AppError = AvatarError::UploadFailed(StorageError::operation("disk full")).into();
        assert_eq!(app.status_code(), 500);
        assert_eq!(app.error_code(), "CANT_UPLOAD_FILE");
        assert_eq!(app.to_string(), "Can't upload file");
    }

    #[test]
    fn test_rejections_are_validation_errors() {
        let app: AppError = AvatarError::Rejected(StorageError::file_too_large(10, 5)).into();
        assert_eq!(app.status_code(), 400);

        let app: AppError = AvatarError::EmptyFileName.into();
        assert_eq!(app.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_vanished_owner_is_not_found() {
        let app: AppError = AvatarError::UserNotFound(UserId::new()).into();
        assert_eq!(app.status_code(), 404);
    }
}
