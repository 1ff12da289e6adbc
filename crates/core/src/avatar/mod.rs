//! Avatar attachment.
//!
//! An avatar is an uploaded image persisted under a per-user directory and
//! referenced from the owner's ordered avatar list. [`AvatarService::attach`]
//! is the only place where avatar records and list entries are created:
//!
//! 1. validate the upload against the storage limits
//! 2. derive the paths with [`PhotoPathBuilder`]
//! 3. ensure the upload directory exists
//! 4. write the file
//! 5. create the record and append it to the owner's list in one atomic step

mod error;
mod paths;
mod service;
mod types;

#[cfg(test)]
mod paths_props;

pub use error::AvatarError;
pub use paths::{PhotoPathBuilder, PhotoPaths};
pub use service::{AvatarRepository, AvatarService};
pub use types::{Avatar, NewAvatar, UploadedFile};
