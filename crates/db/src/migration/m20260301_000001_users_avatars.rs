//! Users and avatars.
//!
//! A user's avatars are kept as an ordered `UUID[]` so that attaching one is a
//! single `array_append`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(USERS_AVATARS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS avatars CASCADE; DROP TABLE IF EXISTS users CASCADE;")
            .await?;
        Ok(())
    }
}

const USERS_AVATARS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    email VARCHAR(255) NOT NULL,
    password_hash VARCHAR(255) NOT NULL,
    age INTEGER,
    avatar_ids UUID[] NOT NULL DEFAULT '{}',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_users_email UNIQUE (email),
    CONSTRAINT chk_users_age CHECK (age IS NULL OR age BETWEEN 0 AND 150)
);

CREATE INDEX idx_users_created ON users(created_at);

CREATE TABLE avatars (
    id UUID PRIMARY KEY,
    url TEXT NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Avatars of one user, oldest first
CREATE INDEX idx_avatars_user ON avatars(user_id, created_at);
";
