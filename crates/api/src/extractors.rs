//! Request extractors.
//!
//! Every rejection is routed through [`ApiError`] so malformed input gets the
//! same JSON error body as domain failures.

use atrium_core::avatar::UploadedFile;
use atrium_core::user::NewUser;
use axum::extract::multipart::Field;
use axum::extract::{FromRequest, FromRequestParts, Multipart, Request};

use crate::error::ApiError;

/// JSON body extractor rejecting with [`ApiError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// Path parameter extractor rejecting with [`ApiError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

/// Query string extractor rejecting with [`ApiError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);

/// File field carrying an avatar.
pub const AVATAR_FIELD: &str = "avatar";

/// Registration form: text fields plus an optional avatar file.
#[derive(Debug)]
pub struct UserForm {
    /// Registration fields.
    pub input: NewUser,
    /// Avatar, when one was attached.
    pub avatar: Option<UploadedFile>,
}

/// Form carrying only an optional avatar file.
#[derive(Debug)]
pub struct AvatarForm {
    /// Avatar, when one was attached.
    pub avatar: Option<UploadedFile>,
}

impl<S> FromRequest<S> for UserForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state).await?;

        let mut name = None;
        let mut email = None;
        let mut password = None;
        let mut age = None;
        let mut avatar = None;

        while let Some(field) = multipart.next_field().await? {
            let field_name = field.name().unwrap_or_default().to_string();
            match field_name.as_str() {
                AVATAR_FIELD => avatar = read_file(field).await?,
                "name" => name = Some(field.text().await?),
                "email" => email = Some(field.text().await?),
                "password" => password = Some(field.text().await?),
                "age" => age = parse_age(&field.text().await?)?,
                _ => {}
            }
        }

        Ok(Self {
            input: NewUser {
                name: required(name, "name")?,
                email: required(email, "email")?,
                password: required(password, "password")?,
                age,
            },
            avatar,
        })
    }
}

impl<S> FromRequest<S> for AvatarForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state).await?;

        let mut avatar = None;
        while let Some(field) = multipart.next_field().await? {
            if field.name() == Some(AVATAR_FIELD) {
                avatar = read_file(field).await?;
            }
        }

        Ok(Self { avatar })
    }
}

/// Read a file field. An empty part without a file name counts as absent.
async fn read_file(field: Field<'_>) -> Result<Option<UploadedFile>, ApiError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(ToString::to_string);
    let bytes = field.bytes().await?;

    if file_name.is_empty() && bytes.is_empty() {
        return Ok(None);
    }

    Ok(Some(UploadedFile::new(file_name, content_type, bytes)))
}

fn parse_age(raw: &str) -> Result<Option<i32>, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| ApiError::validation("age must be a whole number"))
}

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value.ok_or_else(|| ApiError::validation(format!("{field} is required")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("31", Some(31))]
    #[case(" 7 ", Some(7))]
    #[case("", None)]
    fn test_parse_age(#[case] raw: &str, #[case] expected: Option<i32>) {
        assert_eq!(parse_age(raw).unwrap(), expected);
    }

    #[test]
    fn test_parse_age_rejects_text() {
        assert!(parse_age("thirty").is_err());
    }

    #[test]
    fn test_required_field_message() {
        let err = required(None, "email").unwrap_err();
        assert_eq!(err.0.to_string(), "Validation error: email is required");
    }
}
