//! User service implementation.

use std::sync::Arc;

use async_trait::async_trait;
use atrium_shared::types::UserId;
use atrium_shared::{EmailAction, EmailPayload};
use tracing::info;
use validator::Validate;

use super::error::UserError;
use super::types::{CreateUserRecord, NewUser, PublicUser, User, UserChanges, UserPatch};
use crate::auth::CredentialHasher;
use crate::avatar::{AvatarService, UploadedFile};
use crate::notification::Mailer;
use crate::repository::RepositoryError;

/// Storage category for user avatars.
pub const AVATAR_CATEGORY: &str = "users";

/// Repository trait for user persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users, oldest first.
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    /// Find user by ID.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Insert a user. Returns [`RepositoryError::Conflict`] if the email is taken.
    async fn create(&self, record: CreateUserRecord) -> Result<User, RepositoryError>;

    /// Apply `changes` and return the updated user, or `None` if it does not exist.
    async fn update(&self, id: UserId, changes: UserChanges)
    -> Result<Option<User>, RepositoryError>;

    /// Remove a user and return it as it was before removal.
    async fn delete(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
}

/// Behaviour toggles for [`UserService`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UserServiceOptions {
    /// Send [`EmailAction::Welcome`] after registration.
    pub send_welcome: bool,
}

/// User account operations.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    avatars: AvatarService,
    mailer: Arc<dyn Mailer>,
    hasher: Arc<dyn CredentialHasher>,
    options: UserServiceOptions,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        avatars: AvatarService,
        mailer: Arc<dyn Mailer>,
        hasher: Arc<dyn CredentialHasher>,
        options: UserServiceOptions,
    ) -> Self {
        Self {
            users,
            avatars,
            mailer,
            hasher,
            options,
        }
    }

    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn list(&self) -> Result<Vec<PublicUser>, UserError> {
        let users = self.users.list().await.map_err(UserError::Repository)?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    /// Fetch one user.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist.
    pub async fn get(&self, id: UserId) -> Result<PublicUser, UserError> {
        self.find(id).await.map(PublicUser::from)
    }

    /// Register a user, optionally attaching an avatar.
    ///
    /// The user record is committed before the avatar is attached. An
    /// attachment failure is returned as an error while the user remains.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Input validation fails
    /// - The email is already registered
    /// - Hashing, the welcome email or the avatar attachment fails
    pub async fn create(
        &self,
        input: NewUser,
        avatar: Option<UploadedFile>,
    ) -> Result<PublicUser, UserError> {
        input.validate()?;

        let password_hash = self.hasher.hash(&input.password).await?;
        let email = input.email.clone();

        let mut user = self
            .users
            .create(CreateUserRecord {
                id: UserId::new(),
                name: input.name,
                email: input.email,
                password_hash,
                age: input.age,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => UserError::EmailTaken(email),
                other => UserError::Repository(other),
            })?;

        info!(user_id = %user.id, "User created");

        if self.options.send_welcome {
            self.mailer
                .send(
                    &user.email,
                    EmailAction::Welcome,
                    EmailPayload {
                        name: user.name.clone(),
                        email: user.email.clone(),
                        age: None,
                    },
                )
                .await?;
        }

        if let Some(file) = avatar {
            let attached = self.avatars.attach(file, user.id, AVATAR_CATEGORY).await?;
            user.avatar_ids.push(attached.id);
        }

        Ok(user.into())
    }

    /// Attach an avatar to an existing user.
    ///
    /// Without a file this only checks that the user exists.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist, or the attachment error.
    pub async fn add_avatar(
        &self,
        id: UserId,
        avatar: Option<UploadedFile>,
    ) -> Result<(), UserError> {
        let user = self.find(id).await?;

        if let Some(file) = avatar {
            self.avatars.attach(file, user.id, AVATAR_CATEGORY).await?;
        }

        Ok(())
    }

    /// Apply a partial update and notify the user.
    ///
    /// The notification carries the updated details and goes to the address
    /// the account had before the update.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The patch fails validation
    /// - The user does not exist
    /// - The new email is already registered
    /// - Hashing or the notification fails
    pub async fn update(&self, id: UserId, patch: UserPatch) -> Result<(), UserError> {
        patch.validate()?;
        let previous = self.find(id).await?;

        let password_hash = match patch.password.as_deref() {
            Some(password) => Some(self.hasher.hash(password).await?),
            None => None,
        };
        let email = patch.email.clone();

        let changes = UserChanges {
            name: patch.name,
            email: patch.email,
            password_hash,
            age: patch.age,
        };

        let user = self
            .users
            .update(id, changes)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => UserError::EmailTaken(email.unwrap_or_default()),
                RepositoryError::NotFound => UserError::NotFound(id),
                other => UserError::Repository(other),
            })?
            .ok_or(UserError::NotFound(id))?;

        info!(user_id = %user.id, "User updated");

        self.mailer
            .send(
                &previous.email,
                EmailAction::UserUpdate,
                EmailPayload {
                    name: user.name.clone(),
                    email: user.email.clone(),
                    age: user.age,
                },
            )
            .await?;

        Ok(())
    }

    /// Remove a user and notify the address it was registered with.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist, or the repository or
    /// notification error.
    pub async fn delete(&self, id: UserId) -> Result<(), UserError> {
        let removed = self
            .users
            .delete(id)
            .await
            .map_err(UserError::Repository)?
            .ok_or(UserError::NotFound(id))?;

        info!(user_id = %removed.id, "User deleted");

        self.mailer
            .send(
                &removed.email,
                EmailAction::UserDelete,
                EmailPayload {
                    name: removed.name,
                    email: removed.email.clone(),
                    age: None,
                },
            )
            .await?;

        Ok(())
    }

    async fn find(&self, id: UserId) -> Result<User, UserError> {
        self.users
            .find_by_id(id)
            .await
            .map_err(UserError::Repository)?
            .ok_or(UserError::NotFound(id))
    }
}
