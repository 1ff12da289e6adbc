//! Avatar attachment workflow.

use std::sync::Arc;

use async_trait::async_trait;
use atrium_shared::types::{AvatarId, UserId};
use tracing::{debug, info, warn};

use super::error::AvatarError;
use super::paths::PhotoPathBuilder;
use super::types::{Avatar, NewAvatar, UploadedFile};
use crate::repository::RepositoryError;
use crate::storage::FileStorage;

/// Repository trait for avatar persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
#[async_trait]
pub trait AvatarRepository: Send + Sync {
    /// Insert the avatar and append its ID to the owner's avatar list as one
    /// atomic operation.
    ///
    /// Returns [`RepositoryError::NotFound`] without writing anything when the
    /// owner does not exist.
    async fn create_and_link(&self, avatar: NewAvatar) -> Result<Avatar, RepositoryError>;
}

/// Attaches uploaded images to users.
pub struct AvatarService {
    storage: Arc<dyn FileStorage>,
    avatars: Arc<dyn AvatarRepository>,
    paths: PhotoPathBuilder,
}

impl AvatarService {
    /// Create a new avatar service.
    #[must_use]
    pub fn new(
        storage: Arc<dyn FileStorage>,
        avatars: Arc<dyn AvatarRepository>,
        paths: PhotoPathBuilder,
    ) -> Self {
        Self {
            storage,
            avatars,
            paths,
        }
    }

    /// Persist `file` and attach it to `user_id` under `category`.
    ///
    /// Steps run strictly in order and any failure stops the rest. A failure
    /// after the file was written removes the file again.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file name is unusable or the category is invalid
    /// - The file is too large or not an allowed image type
    /// - The directory or file cannot be written (`UploadFailed`)
    /// - The user no longer exists
    /// - The repository fails
    pub async fn attach(
        &self,
        file: UploadedFile,
        user_id: UserId,
        category: &str,
    ) -> Result<Avatar, AvatarError> {
        if file.name.trim().is_empty() {
            return Err(AvatarError::EmptyFileName);
        }

        self.storage
            .validate_upload(&file.mime_type(), file.size())
            .map_err(AvatarError::Rejected)?;

        let paths = self.paths.build(&file.name, user_id, category)?;
        debug!(
            user_id = %user_id,
            path = %paths.final_path.display(),
            "Storing avatar"
        );

        self.storage
            .create_dir(&paths.upload_dir)
            .await
            .map_err(AvatarError::UploadFailed)?;

        self.storage
            .write(&paths.db_path, file.bytes)
            .await
            .map_err(AvatarError::UploadFailed)?;

        let new_avatar = NewAvatar {
            id: AvatarId::new(),
            url: paths.db_path.clone(),
            is_active: true,
            user_id,
        };

        let avatar = match self.avatars.create_and_link(new_avatar).await {
            Ok(avatar) => avatar,
            Err(err) => {
                if let Err(cleanup) = self.storage.delete(&paths.db_path).await {
                    warn!(
                        user_id = %user_id,
                        path = %paths.db_path,
                        error = %cleanup,
                        "Failed to remove avatar file after link failure"
                    );
                }
                return Err(match err {
                    RepositoryError::NotFound => AvatarError::UserNotFound(user_id),
                    other => AvatarError::Repository(other),
                });
            }
        };

        info!(
            user_id = %user_id,
            avatar_id = %avatar.id,
            url = %avatar.url,
            "Avatar attached"
        );

        Ok(avatar)
    }

}
