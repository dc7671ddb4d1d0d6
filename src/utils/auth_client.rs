// src/utils/auth_client.rs

use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};

use crate::{
    error::AppError,
    models::user::{AuthUser, VerifyResponse},
};

/// Why a request could not be authenticated. Callers only ever see a 401;
/// the variant and its cause exist for logs.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing or malformed authorization header")]
    MissingOrMalformedHeader,
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Unauthorized(err.to_string())
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
///
/// Anything else (absent header, other scheme, empty or whitespace-laden token)
/// is rejected here, before any network call.
pub fn extract_token(auth_header: Option<&str>) -> Result<&str, AuthError> {
    let token = auth_header
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingOrMalformedHeader)?;

    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AuthError::MissingOrMalformedHeader);
    }

    Ok(token)
}

/// Client for the auth service's `/api/verify` endpoint.
#[derive(Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    verify_url: String,
}

impl AuthClient {
    /// `auth_service_url` is the service base URL; `timeout` bounds the whole
    /// verification round trip.
    pub fn new(auth_service_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            verify_url: format!("{}/api/verify", auth_service_url.trim_end_matches('/')),
        })
    }

    /// Asks the auth service whether `token` is currently valid.
    ///
    /// Non-2xx answers, transport errors, timeouts and unreadable bodies all
    /// come back as [`AuthError::AuthenticationFailed`].
    pub async fn verify_token(&self, token: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .http
            .post(&self.verify_url)
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await
            .map_err(|e| AuthError::AuthenticationFailed(format!("auth service unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::AuthenticationFailed(format!(
                "auth service answered {}",
                status
            )));
        }

        let body: VerifyResponse = response
            .json()
            .await
            .map_err(|e| AuthError::AuthenticationFailed(format!("unreadable verify response: {}", e)))?;

        match body {
            VerifyResponse {
                valid: true,
                user: Some(user),
                ..
            } => Ok(user),
            _ => Err(AuthError::AuthenticationFailed(
                "verify response did not confirm the token".to_string(),
            )),
        }
    }

    /// Extracts and verifies the bearer token of a request.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
        let auth_header = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let token = extract_token(auth_header)?;
        self.verify_token(token).await
    }
}

/// The identity of whoever is reading, if they proved one.
#[derive(Debug, Clone)]
pub struct Viewer(pub Option<AuthUser>);

/// Axum Middleware: required authentication.
///
/// Verifies the bearer token with the auth service and injects the `AuthUser`
/// into the request extensions. Any failure is a 401.
pub async fn auth_middleware(
    State(auth): State<AuthClient>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = auth.authenticate(req.headers()).await?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Axum Middleware: optional authentication for public reads.
///
/// A request without an `Authorization` header skips the auth service entirely.
/// A header that fails verification is treated exactly like no header.
pub async fn optional_auth_middleware(
    State(auth): State<AuthClient>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let viewer = if req.headers().contains_key(header::AUTHORIZATION) {
        match auth.authenticate(req.headers()).await {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::debug!("Treating request as anonymous: {}", e);
                None
            }
        }
    } else {
        None
    };

    req.extensions_mut().insert(Viewer(viewer));
    next.run(req).await
}
