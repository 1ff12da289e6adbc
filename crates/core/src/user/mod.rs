//! User accounts.
//!
//! [`UserService`] composes the persistence, hashing, storage and mail ports
//! into the operations exposed over HTTP. Responses only ever carry
//! [`PublicUser`], which has no credential field.

mod error;
mod service;
mod types;

pub use error::UserError;
pub use service::{AVATAR_CATEGORY, UserRepository, UserService, UserServiceOptions};
pub use types::{CreateUserRecord, NewUser, PublicUser, User, UserChanges, UserPatch};
