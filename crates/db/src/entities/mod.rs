//! `SeaORM` entities.

pub mod avatars;
pub mod users;
