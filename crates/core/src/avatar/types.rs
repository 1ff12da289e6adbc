//! Avatar types and data structures.

use atrium_shared::types::{AvatarId, UserId};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored avatar record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    /// Avatar ID.
    pub id: AvatarId,
    /// Storage-relative path of the image.
    pub url: String,
    /// Whether the avatar is active.
    pub is_active: bool,
    /// Owner.
    pub user_id: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for creating an avatar record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAvatar {
    /// Pre-generated avatar ID.
    pub id: AvatarId,
    /// Storage-relative path of the image.
    pub url: String,
    /// Whether the avatar is active.
    pub is_active: bool,
    /// Owner whose avatar list receives the ID.
    pub user_id: UserId,
}

/// A file received with a request.
///
/// Lives only for the duration of that request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied file name.
    pub name: String,
    /// Declared content type, if the client sent one.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Create an uploaded file.
    #[must_use]
    pub fn new(name: impl Into<String>, content_type: Option<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type,
            bytes,
        }
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Declared content type, or one guessed from the file extension.
    #[must_use]
    pub fn mime_type(&self) -> String {
        if let Some(declared) = self
            .content_type
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            return declared.to_ascii_lowercase();
        }

        let extension = self
            .name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "application/octet-stream",
        }
        .to_string()
    }
}
