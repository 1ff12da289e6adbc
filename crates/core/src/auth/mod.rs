//! Credential hashing.

mod password;

pub use password::{Argon2Hasher, CredentialHasher, PasswordError, hash_password};
