use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{error::AppError, models::user::AuthUser, services::LikeLedger};

/// Like a post. A second like by the same user is a 400.
pub async fn like_post(
    State(ledger): State<LikeLedger>,
    Extension(user): Extension<AuthUser>,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let receipt = ledger.like(&post_id, &user).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Post liked successfully",
            "like": receipt.like,
            "like_count": receipt.like_count,
        })),
    ))
}

/// Remove the caller's like from a post. 404 if there is none.
pub async fn unlike_post(
    State(ledger): State<LikeLedger>,
    Extension(user): Extension<AuthUser>,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let like_count = ledger.unlike(&post_id, &user).await?;

    Ok(Json(serde_json::json!({
        "message": "Post unliked successfully",
        "like_count": like_count,
    })))
}
