//! Shared types, errors, and configuration for Atrium.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management
//! - Transactional email delivery

pub mod config;
pub mod email;
pub mod error;
pub mod types;

pub use config::{AppConfig, EmailConfig, LogFormat};
pub use email::{EmailAction, EmailError, EmailPayload, EmailService};
pub use error::{AppError, AppResult};
