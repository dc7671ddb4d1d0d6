use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::user::AuthUser;

/// Represents the 'likes' table. `(post_id, user_id)` is unique in storage.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Like {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(post_id: &str, user: &AuthUser) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            post_id: post_id.to_string(),
            user_id: user.user_id.clone(),
            username: user.username.clone(),
            created_at: Utc::now(),
        }
    }
}
