// src/store/mod.rs

//! Storage seams for the two stateful services.
//!
//! Each trait has one implementation per sqlx backend; the SQL is shared and
//! written to run unchanged on both Postgres and SQLite.

pub mod posts;
pub mod users;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{like::Like, post::Post, post::PostView, user::User},
};

pub use posts::{PgPostStore, SqlitePostStore};
pub use users::{PgUserStore, SqliteUserStore};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation(db_err.message().to_string());
            }
        }
        StoreError::Database(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

/// Posts and likes, owned exclusively by the post service.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn insert_post(&self, post: &Post) -> Result<(), StoreError>;

    async fn find_post(&self, post_id: &str) -> Result<Option<Post>, StoreError>;

    /// Newest first, with like counts. `is_liked_by_user` is computed only
    /// when a viewer is given; otherwise it is false and no per-user lookup runs.
    async fn recent_posts(
        &self,
        limit: i64,
        viewer_id: Option<&str>,
    ) -> Result<Vec<PostView>, StoreError>;

    async fn find_like(&self, post_id: &str, user_id: &str) -> Result<Option<Like>, StoreError>;

    /// Fails with [`StoreError::UniqueViolation`] if the pair already has a like.
    async fn insert_like(&self, like: &Like) -> Result<(), StoreError>;

    /// Deletes by like id. Returns whether a row was removed.
    async fn delete_like(&self, like_id: &str) -> Result<bool, StoreError>;

    async fn count_likes(&self, post_id: &str) -> Result<i64, StoreError>;
}

/// Registered accounts, owned exclusively by the auth service.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::UniqueViolation`] on a taken email or username.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}
