//! Core business logic for Atrium.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence, file storage, hashing and mail are reached through the traits
//! defined here and implemented by the outer crates.
//!
//! # Modules
//!
//! - `user` - Account operations and the public user representation
//! - `avatar` - Photo paths and the avatar attachment workflow
//! - `storage` - File storage over Apache OpenDAL
//! - `notification` - Outbound user notifications
//! - `auth` - Password hashing

pub mod auth;
pub mod avatar;
pub mod notification;
pub mod repository;
pub mod storage;
pub mod user;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
