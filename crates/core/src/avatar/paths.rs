//! Destination paths for uploaded photos.

use std::path::PathBuf;

use atrium_shared::types::UserId;

use super::error::AvatarError;

/// Paths derived for one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoPaths {
    /// Storage-relative path recorded on the avatar, e.g. `users/{id}/pic.png`.
    pub db_path: String,
    /// Absolute destination under the storage root.
    pub final_path: PathBuf,
    /// Storage-relative directory to create before writing, with trailing `/`.
    pub upload_dir: String,
}

/// Derives upload paths from a file name, an owner and a category.
///
/// The owner ID is always a path segment, so two users never share a
/// destination. The same owner uploading the same name twice lands on the
/// same path.
#[derive(Debug, Clone)]
pub struct PhotoPathBuilder {
    root: PathBuf,
}

impl PhotoPathBuilder {
    /// Create a builder rooted at the storage root directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Derive the paths for `file_name` owned by `owner` in `category`.
    ///
    /// # Errors
    ///
    /// Returns [`AvatarError::InvalidCategory`] when the category is not a
    /// lowercase path segment and [`AvatarError::EmptyFileName`] when nothing
    /// usable is left of the file name.
    pub fn build(
        &self,
        file_name: &str,
        owner: UserId,
        category: &str,
    ) -> Result<PhotoPaths, AvatarError> {
        if !is_valid_category(category) {
            return Err(AvatarError::InvalidCategory(category.to_string()));
        }

        let name = sanitize_file_name(file_name).ok_or(AvatarError::EmptyFileName)?;

        let upload_dir = format!("{category}/{owner}/");
        let db_path = format!("{upload_dir}{name}");
        let final_path = self.root.join(category).join(owner.to_string()).join(&name);

        Ok(PhotoPaths {
            db_path,
            final_path,
            upload_dir,
        })
    }
}

fn is_valid_category(category: &str) -> bool {
    !category.is_empty()
        && category
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
}

/// Reduce a client-supplied name to a safe final path component.
///
/// Keeps the last component, replaces anything outside `[A-Za-z0-9._-]` with
/// `_` and strips leading dots. Returns `None` when nothing remains.
pub(crate) fn sanitize_file_name(file_name: &str) -> Option<String> {
    let last = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let sanitized: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let sanitized = sanitized.trim_start_matches('.');
    if sanitized.is_empty() {
        None
    } else {
        Some(sanitized.to_string())
    }
}
