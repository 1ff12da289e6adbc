//! Storage service implementation using Apache OpenDAL.

use async_trait::async_trait;
use bytes::Bytes;
use opendal::{Operator, services};

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// File persistence capability used by the avatar workflow.
///
/// Keys are `/`-separated paths relative to the storage root.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Check an upload against size and type limits before anything is written.
    fn validate_upload(&self, content_type: &str, size: u64) -> Result<(), StorageError>;

    /// Ensure a directory exists, creating parents as needed.
    ///
    /// Succeeds when the directory is already present.
    async fn create_dir(&self, dir: &str) -> Result<(), StorageError>;

    /// Write `bytes` to `key`, replacing any existing file.
    async fn write(&self, key: &str, bytes: Bytes) -> Result<(), StorageError>;

    /// Remove the file at `key`. Missing files are not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage service for uploaded files.
#[derive(Debug, Clone)]
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        let operator = match provider {
            StorageProvider::LocalFs { root } => {
                let root = root
                    .to_str()
                    .ok_or_else(|| StorageError::configuration("invalid path"))?;
                let builder = services::Fs::default().root(root);
                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::Memory => Operator::new(services::Memory::default())
                .map_err(|e| StorageError::configuration(e.to_string()))?
                .finish(),
        };

        Ok(operator)
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }
}

#[async_trait]
impl FileStorage for StorageService {
    fn validate_upload(&self, content_type: &str, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }

        if !self.config.is_mime_type_allowed(content_type) {
            return Err(StorageError::invalid_mime_type(content_type));
        }

        Ok(())
    }

    async fn create_dir(&self, dir: &str) -> Result<(), StorageError> {
        // Object stores without directory support create prefixes on write.
        if !self.operator.info().full_capability().create_dir {
            return Ok(());
        }

        let dir = if dir.ends_with('/') {
            dir.to_string()
        } else {
            format!("{dir}/")
        };

        self.operator.create_dir(&dir).await.map_err(StorageError::from)
    }

    async fn write(&self, key: &str, bytes: Bytes) -> Result<(), StorageError> {
        self.operator
            .write(key, bytes)
            .await
            .map(|_| ())
            .map_err(StorageError::from)
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.operator.delete(key).await.map_err(StorageError::from)
    }
}
