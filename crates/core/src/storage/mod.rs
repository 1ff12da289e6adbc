//! File storage for uploaded avatars using Apache OpenDAL.
//!
//! This module provides vendor-agnostic object storage with support for:
//! - Local filesystem (default)
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, DigitalOcean Spaces
//! - Azure Blob Storage
//! - In-process memory (tests)
//!
//! Callers depend on the [`FileStorage`] capability; [`StorageService`] is the
//! OpenDAL-backed implementation.

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{FileStorage, StorageService};
