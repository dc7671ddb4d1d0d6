use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::models::user::AuthUser;

/// Represents the 'posts' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub content: String,
    pub author_id: String,
    pub author_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(content: String, author: &AuthUser) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content,
            author_id: author.user_id.clone(),
            author_username: author.username.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A feed entry: the post plus its like annotations for the viewer.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PostView {
    pub id: String,
    pub content: String,
    pub author_id: String,
    pub author_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Recomputed from the likes table on every read.
    pub like_count: i64,
    /// Always false for anonymous viewers.
    pub is_liked_by_user: bool,
}

/// DTO for creating a new post.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(
            max = 500,
            message = "Content must be at most 500 characters"
        )
    )]
    pub content: String,
}

fn not_blank(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::from("Content is required")));
    }
    Ok(())
}
