use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::Response,
};

use crate::{error::AppError, proxy, state::GatewayState};

/// Catch-all gateway handler: picks the upstream by path prefix and relays.
///
/// No authentication happens here; the `Authorization` header is passed along
/// and the upstream decides.
pub async fn forward(
    State(state): State<GatewayState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let (upstream, path) = proxy::resolve(uri.path())
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;

    state
        .proxy
        .forward(upstream, &path, uri.query(), method, &headers, body)
        .await
}
