use async_trait::async_trait;
use sqlx::{PgPool, SqlitePool};

use super::{PostStore, StoreError};
use crate::models::{like::Like, post::Post, post::PostView};

const INSERT_POST: &str = r#"
    INSERT INTO posts (id, content, author_id, author_username, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6)
"#;

const FIND_POST: &str = r#"
    SELECT id, content, author_id, author_username, created_at, updated_at
    FROM posts
    WHERE id = $1
"#;

const RECENT_POSTS_ANONYMOUS: &str = r#"
    SELECT
        p.id, p.content, p.author_id, p.author_username, p.created_at, p.updated_at,
        (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
        FALSE AS is_liked_by_user
    FROM posts p
    ORDER BY p.created_at DESC, p.id DESC
    LIMIT $1
"#;

const RECENT_POSTS_FOR_VIEWER: &str = r#"
    SELECT
        p.id, p.content, p.author_id, p.author_username, p.created_at, p.updated_at,
        (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
        EXISTS (
            SELECT 1 FROM likes l WHERE l.post_id = p.id AND l.user_id = $2
        ) AS is_liked_by_user
    FROM posts p
    ORDER BY p.created_at DESC, p.id DESC
    LIMIT $1
"#;

const FIND_LIKE: &str = r#"
    SELECT id, post_id, user_id, username, created_at
    FROM likes
    WHERE post_id = $1 AND user_id = $2
"#;

const INSERT_LIKE: &str = r#"
    INSERT INTO likes (id, post_id, user_id, username, created_at)
    VALUES ($1, $2, $3, $4, $5)
"#;

const DELETE_LIKE: &str = "DELETE FROM likes WHERE id = $1";

const COUNT_LIKES: &str = "SELECT COUNT(*) FROM likes WHERE post_id = $1";

/// Implements [`PostStore`] over a concrete sqlx pool type.
macro_rules! sql_post_store {
    ($(#[$meta:meta])* $name:ident, $pool:ty) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            pool: $pool,
        }

        impl $name {
            pub fn new(pool: $pool) -> Self {
                Self { pool }
            }
        }

        #[async_trait]
        impl PostStore for $name {
            async fn insert_post(&self, post: &Post) -> Result<(), StoreError> {
                sqlx::query(INSERT_POST)
                    .bind(&post.id)
                    .bind(&post.content)
                    .bind(&post.author_id)
                    .bind(&post.author_username)
                    .bind(post.created_at)
                    .bind(post.updated_at)
                    .execute(&self.pool)
                    .await?;
                Ok(())
            }

            async fn find_post(&self, post_id: &str) -> Result<Option<Post>, StoreError> {
                let post = sqlx::query_as::<_, Post>(FIND_POST)
                    .bind(post_id)
                    .fetch_optional(&self.pool)
                    .await?;
                Ok(post)
            }

            async fn recent_posts(
                &self,
                limit: i64,
                viewer_id: Option<&str>,
            ) -> Result<Vec<PostView>, StoreError> {
                let posts = match viewer_id {
                    Some(viewer_id) => {
                        sqlx::query_as::<_, PostView>(RECENT_POSTS_FOR_VIEWER)
                            .bind(limit)
                            .bind(viewer_id)
                            .fetch_all(&self.pool)
                            .await?
                    }
                    None => {
                        sqlx::query_as::<_, PostView>(RECENT_POSTS_ANONYMOUS)
                            .bind(limit)
                            .fetch_all(&self.pool)
                            .await?
                    }
                };
                Ok(posts)
            }

            async fn find_like(
                &self,
                post_id: &str,
                user_id: &str,
            ) -> Result<Option<Like>, StoreError> {
                let like = sqlx::query_as::<_, Like>(FIND_LIKE)
                    .bind(post_id)
                    .bind(user_id)
                    .fetch_optional(&self.pool)
                    .await?;
                Ok(like)
            }

            async fn insert_like(&self, like: &Like) -> Result<(), StoreError> {
                sqlx::query(INSERT_LIKE)
                    .bind(&like.id)
                    .bind(&like.post_id)
                    .bind(&like.user_id)
                    .bind(&like.username)
                    .bind(like.created_at)
                    .execute(&self.pool)
                    .await?;
                Ok(())
            }

            async fn delete_like(&self, like_id: &str) -> Result<bool, StoreError> {
                let result = sqlx::query(DELETE_LIKE)
                    .bind(like_id)
                    .execute(&self.pool)
                    .await?;
                Ok(result.rows_affected() > 0)
            }

            async fn count_likes(&self, post_id: &str) -> Result<i64, StoreError> {
                let count: i64 = sqlx::query_scalar(COUNT_LIKES)
                    .bind(post_id)
                    .fetch_one(&self.pool)
                    .await?;
                Ok(count)
            }
        }
    };
}

sql_post_store!(
    /// Production post storage.
    PgPostStore,
    PgPool
);

sql_post_store!(
    /// Post storage for local runs and tests.
    SqlitePostStore,
    SqlitePool
);
