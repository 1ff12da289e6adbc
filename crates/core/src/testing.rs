//! In-memory port implementations for tests.
//!
//! Enabled for this crate's own tests and, through the `testing` feature, for
//! downstream crates.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use atrium_shared::types::UserId;
use atrium_shared::{EmailAction, EmailPayload};
use bytes::Bytes;
use chrono::Utc;

use crate::avatar::{Avatar, AvatarRepository, NewAvatar};
use crate::notification::{Mailer, NotificationError};
use crate::repository::RepositoryError;
use crate::storage::{FileStorage, StorageConfig, StorageError, StorageProvider};
use crate::user::{CreateUserRecord, User, UserChanges, UserRepository};

#[derive(Default)]
struct StoreState {
    users: Vec<User>,
    avatars: Vec<Avatar>,
}

/// Users and avatars behind one lock, so linking is atomic like the
/// database transaction it stands in for.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    /// Snapshot of all avatar records.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn avatars(&self) -> Vec<Avatar> {
        self.state.lock().unwrap().avatars.clone()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.state.lock().unwrap().users.clone())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, record: CreateUserRecord) -> Result<User, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.email == record.email) {
            return Err(RepositoryError::Conflict(record.email));
        }

        let now = Utc::now();
        let user = User {
            id: record.id,
            name: record.name,
            email: record.email,
            password_hash: record.password_hash,
            age: record.age,
            avatar_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn update(
        &self,
        id: UserId,
        changes: UserChanges,
    ) -> Result<Option<User>, RepositoryError> {
        let mut state = self.state.lock().unwrap();

        if let Some(email) = &changes.email
            && state.users.iter().any(|u| u.id != id && &u.email == email)
        {
            return Err(RepositoryError::Conflict(email.clone()));
        }

        let Some(user) = state.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        if let Some(age) = changes.age {
            user.age = age;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let Some(pos) = state.users.iter().position(|u| u.id == id) else {
            return Ok(None);
        };
        let removed = state.users.remove(pos);
        state.avatars.retain(|a| a.user_id != id);
        Ok(Some(removed))
    }
}

#[async_trait]
impl AvatarRepository for InMemoryStore {
    async fn create_and_link(&self, avatar: NewAvatar) -> Result<Avatar, RepositoryError> {
        let mut state = self.state.lock().unwrap();

        let Some(user) = state.users.iter_mut().find(|u| u.id == avatar.user_id) else {
            return Err(RepositoryError::NotFound);
        };
        user.avatar_ids.push(avatar.id);
        user.updated_at = Utc::now();

        let avatar = Avatar {
            id: avatar.id,
            url: avatar.url,
            is_active: avatar.is_active,
            user_id: avatar.user_id,
            created_at: Utc::now(),
        };
        state.avatars.push(avatar.clone());
        Ok(avatar)
    }

}

/// File storage that keeps everything in maps and can be told to fail.
pub struct InMemoryStorage {
    config: StorageConfig,
    dirs: Mutex<BTreeSet<String>>,
    files: Mutex<BTreeMap<String, Bytes>>,
    fail_writes: AtomicBool,
    fail_create_dir: AtomicBool,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new(StorageConfig::new(StorageProvider::Memory))
    }
}

impl InMemoryStorage {
    /// Create with the given limits.
    #[must_use]
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            dirs: Mutex::new(BTreeSet::new()),
            files: Mutex::new(BTreeMap::new()),
            fail_writes: AtomicBool::new(false),
            fail_create_dir: AtomicBool::new(false),
        }
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent directory creation fail.
    pub fn fail_create_dir(&self, fail: bool) {
        self.fail_create_dir.store(fail, Ordering::SeqCst);
    }

    /// Directories created so far.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn dirs(&self) -> BTreeSet<String> {
        self.dirs.lock().unwrap().clone()
    }

    /// Stored file keys.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn files(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    /// Contents of one stored file.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn file(&self, key: &str) -> Option<Bytes> {
        self.files.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl FileStorage for InMemoryStorage {
    fn validate_upload(&self, content_type: &str, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(size, self.config.max_file_size));
        }
        if !self.config.is_mime_type_allowed(content_type) {
            return Err(StorageError::invalid_mime_type(content_type));
        }
        Ok(())
    }

    async fn create_dir(&self, dir: &str) -> Result<(), StorageError> {
        if self.fail_create_dir.load(Ordering::SeqCst) {
            return Err(StorageError::operation("permission denied"));
        }
        self.dirs.lock().unwrap().insert(dir.to_string());
        Ok(())
    }

    async fn write(&self, key: &str, bytes: Bytes) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::operation("disk full"));
        }
        self.files.lock().unwrap().insert(key.to_string(), bytes);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.files.lock().unwrap().remove(key);
        Ok(())
    }
}

/// A notification captured by [`RecordingMailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    /// Recipient address.
    pub recipient: String,
    /// Action sent.
    pub action: EmailAction,
    /// Template payload.
    pub payload: EmailPayload,
}

/// Mailer that records instead of sending.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentEmail>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    /// Notifications sent so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }

    /// Make every subsequent send fail.
    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(
        &self,
        recipient: &str,
        action: EmailAction,
        payload: EmailPayload,
    ) -> Result<(), NotificationError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotificationError::Delivery("connection refused".into()));
        }
        self.sent.lock().unwrap().push(SentEmail {
            recipient: recipient.to_string(),
            action,
            payload,
        });
        Ok(())
    }
}
