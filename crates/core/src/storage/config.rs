//! Storage configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// Local filesystem
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// In-process memory (tests only)
    Memory,
}

impl StorageProvider {
    /// Create local filesystem provider.
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LocalFs { .. } => "local",
            Self::Memory => "memory",
        }
    }
}

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
    /// Allowed MIME types for upload.
    pub allowed_mime_types: Vec<String>,
}

impl StorageConfig {
    /// Default max file size: 5MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            allowed_mime_types: Self::default_mime_types(),
        }
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Default allowed MIME types for avatars.
    #[must_use]
    pub fn default_mime_types() -> Vec<String> {
        ["image/png", "image/jpeg", "image/gif", "image/webp"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Check if a MIME type is allowed.
    #[must_use]
    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.iter().any(|t| t == mime_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_names() {
        assert_eq!(StorageProvider::local_fs("./static").name(), "local");
        assert_eq!(StorageProvider::Memory.name(), "memory");
    }

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::new(StorageProvider::Memory);
        assert_eq!(config.max_file_size, StorageConfig::DEFAULT_MAX_FILE_SIZE);
        assert!(config.is_mime_type_allowed("image/png"));
        assert!(config.is_mime_type_allowed("image/jpeg"));
        assert!(!config.is_mime_type_allowed("application/pdf"));
        assert!(!config.is_mime_type_allowed("text/html"));
    }
}
