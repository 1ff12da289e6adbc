//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Fixed message reported when an uploaded file cannot be stored.
pub const CANT_UPLOAD_FILE_MESSAGE: &str = "Can't upload file";

/// Application error types.
///
/// Every domain error is converted into one of these before it reaches the
/// HTTP layer, which renders it through [`AppError::status_code`] and
/// [`AppError::error_code`].
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict (e.g., duplicate entry).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Request body exceeds the configured limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// An uploaded file could not be persisted.
    #[error("{CANT_UPLOAD_FILE_MESSAGE}")]
    UploadFailed,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// External service error.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::PayloadTooLarge(_) => 413,
            Self::UploadFailed
            | Self::Database(_)
            | Self::ExternalService(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            Self::UploadFailed => "CANT_UPLOAD_FILE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true for errors caused by the server rather than the request.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::NotFound(String::new()), 404, "NOT_FOUND")]
    #[case(AppError::Validation(String::new()), 400, "VALIDATION_ERROR")]
    #[case(AppError::Conflict(String::new()), 409, "CONFLICT")]
    #[case(AppError::PayloadTooLarge(String::new()), 413, "PAYLOAD_TOO_LARGE")]
    #[case(AppError::UploadFailed, 500, "CANT_UPLOAD_FILE")]
    #[case(AppError::Database(String::new()), 500, "DATABASE_ERROR")]
    #[case(AppError::ExternalService(String::new()), 500, "EXTERNAL_SERVICE_ERROR")]
    #[case(AppError::Internal(String::new()), 500, "INTERNAL_ERROR")]
    fn test_error_mapping(#[case] err: AppError, #[case] status: u16, #[case] code: &str) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.error_code(), code);
        assert_eq!(err.is_server_error(), status >= 500);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::NotFound("user".into()).to_string(),
            "Not found: user"
        );
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(AppError::UploadFailed.to_string(), "Can't upload file");
        assert_eq!(
            AppError::ExternalService("smtp".into()).to_string(),
            "External service error: smtp"
        );
    }
}
