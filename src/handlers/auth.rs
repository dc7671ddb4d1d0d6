// src/handlers/auth.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{AuthUser, LoginRequest, SignupRequest, User, VerifyRequest, VerifyResponse},
    store::{StoreError, UserStore},
    utils::{
        hash::{hash_password, verify_password},
        jwt::TokenCodec,
    },
};

/// Registers a new user and signs them in.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created with a token and the public user fields.
pub async fn signup(
    State(users): State<Arc<dyn UserStore>>,
    State(tokens): State<TokenCodec>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        email: payload.email.trim().to_lowercase(),
        username: payload.username.trim().to_string(),
        password_hash: hash_password(&payload.password)?,
        created_at: chrono::Utc::now(),
    };

    users.insert_user(&user).await.map_err(|e| match e {
        StoreError::UniqueViolation(_) => {
            AppError::Conflict("Email or username already registered".to_string())
        }
        e => {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    let auth_user = AuthUser::from(&user);
    let token = tokens.issue(&auth_user)?;
    tracing::info!(user_id = %user.id, "User signed up");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "token": token,
            "user": auth_user,
        })),
    ))
}

/// Authenticates a user and returns a fresh token.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(
    State(users): State<Arc<dyn UserStore>>,
    State(tokens): State<TokenCodec>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let email = payload.email.trim().to_lowercase();
    let user = users
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| AppError::Unauthorized(format!("no account for {}", email)))?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(AppError::Unauthorized(format!("wrong password for {}", email)));
    }

    let auth_user = AuthUser::from(&user);
    let token = tokens.issue(&auth_user)?;

    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "user": auth_user,
    })))
}

/// Verifies a token on behalf of another service.
///
/// Failures are reported only through the status code and `valid: false`.
pub async fn verify(
    State(tokens): State<TokenCodec>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> impl IntoResponse {
    let token = match payload {
        Ok(Json(VerifyRequest { token: Some(token) })) if !token.is_empty() => token,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(VerifyResponse {
                    valid: false,
                    user: None,
                    error: Some("Token is required".to_string()),
                }),
            );
        }
    };

    match tokens.verify(&token) {
        Ok(claims) => (
            StatusCode::OK,
            Json(VerifyResponse {
                valid: true,
                user: Some(claims.user()),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::debug!("Token rejected: {}", e);
            (
                StatusCode::UNAUTHORIZED,
                Json(VerifyResponse {
                    valid: false,
                    user: None,
                    error: Some("Invalid or expired token".to_string()),
                }),
            )
        }
    }
}
