//! Fixed response vocabulary.

use axum::http::StatusCode;
use serde::Serialize;

/// Statuses used by the user handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ResponseCode {
    /// 200
    Ok = 200,
    /// 201
    Created = 201,
    /// 204
    Delete = 204,
    /// 500
    ServerError = 500,
}

impl ResponseCode {
    /// HTTP status for this code.
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::Ok => StatusCode::OK,
            Self::Created => StatusCode::CREATED,
            Self::Delete => StatusCode::NO_CONTENT,
            Self::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Acknowledgement body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MessageResponse {
    /// Acknowledgement text.
    pub message: &'static str,
}

/// Body sent after an update or avatar addition.
pub const UPDATE_ANSWER: MessageResponse = MessageResponse { message: "Updated" };

/// Body sent after a deletion when a JSON acknowledgement is requested.
pub const DELETE_ANSWER: MessageResponse = MessageResponse { message: "Deleted" };

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_statuses() {
        for code in [
            ResponseCode::Ok,
            ResponseCode::Created,
            ResponseCode::Delete,
            ResponseCode::ServerError,
        ] {
            assert_eq!(code.status().as_u16(), code as u16);
        }
    }

    #[test]
    fn test_answers() {
        assert_eq!(
            serde_json::to_string(&UPDATE_ANSWER).unwrap(),
            r#"{"message":"Updated"}"#
        );
        assert_eq!(
            serde_json::to_string(&DELETE_ANSWER).unwrap(),
            r#"{"message":"Deleted"}"#
        );
    }
}
