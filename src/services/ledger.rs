// src/services/ledger.rs

use std::sync::Arc;

use serde::Serialize;

use crate::{
    error::AppError,
    models::{like::Like, user::AuthUser},
    store::{PostStore, StoreError},
};

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Post not found")]
    PostNotFound,
    #[error("Post already liked")]
    AlreadyLiked,
    #[error("Like not found")]
    LikeNotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::PostNotFound | LedgerError::LikeNotFound => {
                AppError::NotFound(err.to_string())
            }
            // 400 rather than 409, matching what clients already expect.
            LedgerError::AlreadyLiked => AppError::BadRequest(err.to_string()),
            LedgerError::Store(e) => e.into(),
        }
    }
}

/// Result of a successful like.
#[derive(Debug, Serialize)]
pub struct LikeReceipt {
    pub like: Like,
    pub like_count: i64,
}

/// Owns the one-like-per-(user, post) rule.
///
/// Each pair is either `NotLiked` or `Liked`. The existence checks here only
/// produce clean errors early; exclusion under concurrency comes from the
/// unique `(post_id, user_id)` constraint in storage.
#[derive(Clone)]
pub struct LikeLedger {
    store: Arc<dyn PostStore>,
}

impl LikeLedger {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    /// `NotLiked -> Liked`. Fails with `PostNotFound` or `AlreadyLiked`.
    pub async fn like(&self, post_id: &str, user: &AuthUser) -> Result<LikeReceipt, LedgerError> {
        if self.store.find_post(post_id).await?.is_none() {
            return Err(LedgerError::PostNotFound);
        }

        if self.store.find_like(post_id, &user.user_id).await?.is_some() {
            return Err(LedgerError::AlreadyLiked);
        }

        let like = Like::new(post_id, user);
        match self.store.insert_like(&like).await {
            Ok(()) => {}
            // Lost the race against a concurrent like for the same pair.
            Err(StoreError::UniqueViolation(cause)) => {
                tracing::debug!(post_id, user_id = %user.user_id, "Concurrent like rejected: {}", cause);
                return Err(LedgerError::AlreadyLiked);
            }
            Err(e) => return Err(e.into()),
        }

        let like_count = self.count_likes(post_id).await?;
        tracing::info!(post_id, user_id = %user.user_id, like_count, "Post liked");

        Ok(LikeReceipt { like, like_count })
    }

    /// `Liked -> NotLiked`. Returns the new like count, or `LikeNotFound`.
    pub async fn unlike(&self, post_id: &str, user: &AuthUser) -> Result<i64, LedgerError> {
        let like = self
            .store
            .find_like(post_id, &user.user_id)
            .await?
            .ok_or(LedgerError::LikeNotFound)?;

        // Delete by the like's own id so a like re-created in the meantime survives.
        if !self.store.delete_like(&like.id).await? {
            return Err(LedgerError::LikeNotFound);
        }

        let like_count = self.count_likes(post_id).await?;
        tracing::info!(post_id, user_id = %user.user_id, like_count, "Post unliked");

        Ok(like_count)
    }

    /// Always read from storage; there is no cached counter.
    pub async fn count_likes(&self, post_id: &str) -> Result<i64, LedgerError> {
        Ok(self.store.count_likes(post_id).await?)
    }
}
