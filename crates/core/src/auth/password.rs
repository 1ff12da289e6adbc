//! Password hashing with Argon2id.
//!
//! Uses the recommended Argon2id variant with secure defaults. Hashing is
//! CPU-bound, so [`Argon2Hasher`] moves it onto the blocking thread pool.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Failed to hash password.
    #[error("failed to hash password: {0}")]
    HashError(String),

}

/// One-way credential hashing capability.
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Hashes a plaintext credential into a PHC string.
    async fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;
}

/// Argon2id-backed [`CredentialHasher`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

#[async_trait]
impl CredentialHasher for Argon2Hasher {
    async fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let plaintext = plaintext.to_owned();
        tokio::task::spawn_blocking(move || hash_password(&plaintext))
            .await
            .map_err(|e| PasswordError::HashError(e.to_string()))?
    }
}

/// Hashes a password using Argon2id.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails.
///
/// # Example
///
/// ```
/// use atrium_core::auth::hash_password;
///
/// let hash = hash_password("my_secure_password").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{PasswordHash, PasswordVerifier};

    fn matches(password: &str, hash: &str) -> bool {
        let parsed = PasswordHash::new(hash).expect("hash should parse");
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    #[test]
    fn test_hash_password() {
        let hash = hash_password("test_password_123!").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_same_password_different_hashes() {
        let hash1 = hash_password("password1").unwrap();
        let hash2 = hash_password("password1").unwrap();
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_hash_matches_only_its_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(matches("correct horse", &hash));
        assert!(!matches("battery staple", &hash));
    }

    #[tokio::test]
    async fn test_argon2_hasher_round_trip() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash("correct horse").await.unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(matches("correct horse", &hash));
    }
}
