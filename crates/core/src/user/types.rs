//! User types and data structures.

use atrium_shared::types::{AvatarId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// A persisted user, including the credential hash.
///
/// Never serialized; convert to [`PublicUser`] first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Age in years.
    pub age: Option<i32>,
    /// Attached avatars in attachment order.
    pub avatar_ids: Vec<AvatarId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Public representation of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Age in years.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    /// Attached avatars in attachment order.
    pub avatars: Vec<AvatarId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            age: user.age,
            avatars: user.avatar_ids,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Registration input.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUser {
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "name must not be empty"))]
    pub name: String,
    /// Email address.
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    /// Age in years.
    #[validate(range(min = 0, max = 150, message = "age must be between 0 and 150"))]
    pub age: Option<i32>,
}

/// Partial update. Absent fields are left untouched.
///
/// `age` distinguishes an absent key (`None`) from an explicit `null`
/// (`Some(None)`), which clears the stored age.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UserPatch {
    /// New display name.
    #[validate(length(min = 1, max = 100, message = "name must not be empty"))]
    pub name: Option<String>,
    /// New email address.
    #[validate(email(message = "invalid email address"))]
    pub email: Option<String>,
    /// New plaintext password.
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: Option<String>,
    /// New age, or `Some(None)` to clear it.
    #[serde(default, deserialize_with = "present")]
    #[validate(range(min = 0, max = 150, message = "age must be between 0 and 150"))]
    pub age: Option<Option<i32>>,
}

/// Marks a key as present, keeping `null` as `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Row data for inserting a user.
#[derive(Debug, Clone)]
pub struct CreateUserRecord {
    /// Pre-generated ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Age in years.
    pub age: Option<i32>,
}

/// Column changes for updating a user.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    /// New display name.
    pub name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New credential hash.
    pub password_hash: Option<String>,
    /// New age; `Some(None)` stores no age.
    pub age: Option<Option<i32>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: UserId::new(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            age: Some(30),
            avatar_ids: vec![AvatarId::new()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_public_user_has_no_credential() {
        let user = user();
        let json = serde_json::to_value(PublicUser::from(user.clone())).unwrap();

        let object = json.as_object().unwrap();
        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("password_hash"));
        assert!(!json.to_string().contains("argon2id"));
        assert_eq!(object["email"], "ada@example.com");
        assert_eq!(object["avatars"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_new_user_validation() {
        let valid = NewUser {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "correct horse".into(),
            age: Some(30),
        };
        assert!(valid.validate().is_ok());

        let errors = NewUser {
            name: String::new(),
            email: "nope".into(),
            password: "short".into(),
            age: Some(200),
        }
        .validate()
        .unwrap_err();

        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("age"));
    }

    #[test]
    fn test_patch_validates_present_fields_only() {
        assert!(UserPatch::default().validate().is_ok());
        assert!(UserPatch {
            age: Some(Some(31)),
            ..UserPatch::default()
        }
        .validate()
        .is_ok());
        assert!(UserPatch {
            age: Some(Some(-1)),
            ..UserPatch::default()
        }
        .validate()
        .is_err());
        assert!(UserPatch {
            age: Some(None),
            ..UserPatch::default()
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn test_patch_age_null_differs_from_absent() {
        let absent: UserPatch = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();
        assert_eq!(absent.age, None);

        let cleared: UserPatch = serde_json::from_str(r#"{"age":null}"#).unwrap();
        assert_eq!(cleared.age, Some(None));

        let set: UserPatch = serde_json::from_str(r#"{"age":31}"#).unwrap();
        assert_eq!(set.age, Some(Some(31)));
    }

    #[test]
    fn test_patch_rejects_unknown_fields() {
        let result: Result<UserPatch, _> = serde_json::from_str(r#"{"role":"admin"}"#);
        assert!(result.is_err());
    }
}
