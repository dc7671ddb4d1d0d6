use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        post::{CreatePostRequest, Post},
        user::AuthUser,
    },
    services::FeedAssembler,
    store::PostStore,
    utils::auth_client::Viewer,
};

/// Create a new post.
/// Requires: a verified bearer token. Content is validated before anything is stored.
pub async fn create_post(
    State(store): State<Arc<dyn PostStore>>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let post = Post::new(payload.content, &user);
    store.insert_post(&post).await.map_err(|e| {
        tracing::error!("Failed to create post: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!(post_id = %post.id, author_id = %post.author_id, "Post created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Post created successfully",
            "post": post,
        })),
    ))
}

/// List the feed (newest first, capped).
/// Public: the viewer, if any, only decides `is_liked_by_user`.
pub async fn list_posts(
    State(feed): State<FeedAssembler>,
    Extension(Viewer(viewer)): Extension<Viewer>,
) -> Result<impl IntoResponse, AppError> {
    let posts = feed.get_feed(viewer.as_ref()).await.map_err(|e| {
        tracing::error!("Failed to list posts: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(serde_json::json!({ "posts": posts })))
}
