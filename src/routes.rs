// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{self, auth, gateway, likes, posts},
    state::{AuthState, GatewayState, PostState},
    utils::auth_client::{auth_middleware, optional_auth_middleware},
};

/// Auth service router: token issuance and the verification endpoint.
pub fn create_auth_router(state: AuthState) -> Router {
    Router::new()
        .route("/api/signup", post(auth::signup))
        .route("/api/login", post(auth::login))
        .route("/api/verify", post(auth::verify))
        .route("/health", get(|| async { handlers::health("auth-service") }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Post service router.
///
/// * `GET /api/posts` is public; a valid token only personalizes it.
/// * Writing routes require a token the auth service accepts.
pub fn create_post_router(state: PostState) -> Router {
    let auth = state.auth.clone();

    let feed = get(posts::list_posts).route_layer(middleware::from_fn_with_state(
        auth.clone(),
        optional_auth_middleware,
    ));
    let create = post(posts::create_post)
        .route_layer(middleware::from_fn_with_state(auth.clone(), auth_middleware));
    let like = post(likes::like_post)
        .delete(likes::unlike_post)
        .route_layer(middleware::from_fn_with_state(auth, auth_middleware));

    Router::new()
        .route("/api/posts", feed.merge(create))
        .route("/api/posts/{id}/like", like)
        .route("/health", get(|| async { handlers::health("post-service") }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Gateway router: everything except `/health` is forwarded by path prefix.
pub fn create_gateway_router(state: GatewayState, cors_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(|| async { handlers::health("gateway") }))
        .fallback(gateway::forward)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
