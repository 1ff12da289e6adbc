//! Error-to-HTTP mapping.

use atrium_core::user::UserError;
use atrium_shared::AppError;
use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, info};

/// Error returned by every handler.
///
/// Renders as `{"error": code, "message": message}` with the status of the
/// wrapped [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self(AppError::Validation(msg.into()))
    }

    /// Map an extractor rejection, keeping the size-limit status.
    fn rejected(status: StatusCode, body: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            Self(AppError::PayloadTooLarge(body))
        } else {
            Self::validation(body)
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::rejected(err.status(), err.body_text())
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = match &err {
            AppError::Database(_) | AppError::Internal(_) => {
                error!(error = %err, code = err.error_code(), "Request failed");
                "An internal error occurred".to_string()
            }
            _ if err.is_server_error() => {
                error!(error = %err, code = err.error_code(), "Request failed");
                err.to_string()
            }
            _ => {
                info!(error = %err, code = err.error_code(), "Request rejected");
                err.to_string()
            }
        };

        (
            status,
            Json(json!({
                "error": err.error_code(),
                "message": message,
            })),
        )
            .into_response()
    }
}
