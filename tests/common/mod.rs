// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use social_backend::{
    create_auth_router, create_gateway_router, create_post_router, db,
    proxy::ProxyClient,
    state::{AuthState, GatewayState, PostState},
    store::PostStore,
    utils::{auth_client::AuthClient, jwt::TokenCodec},
};
use url::Url;

pub const TEST_SECRET: &str = "test_secret_for_integration_tests";

/// Token lifetime used by the test auth service (10 minutes).
pub const TEST_TTL: u64 = 600;

/// Binds the router to a random local port and serves it in the background.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{}", port)
}

/// A codec sharing the test auth service's secret, for minting tokens directly.
pub fn codec() -> TokenCodec {
    TokenCodec::new(TEST_SECRET, TEST_TTL)
}

pub async fn spawn_auth_service() -> String {
    let users = db::connect_user_store("sqlite::memory:")
        .await
        .expect("Failed to open in-memory user store");

    let state = AuthState {
        users,
        tokens: codec(),
    };

    serve(create_auth_router(state)).await
}

pub async fn post_store() -> Arc<dyn PostStore> {
    db::connect_post_store("sqlite::memory:")
        .await
        .expect("Failed to open in-memory post store")
}

pub async fn spawn_post_service(auth_url: &str, auth_timeout: Duration) -> String {
    spawn_post_service_with_store(auth_url, auth_timeout, post_store().await).await
}

pub async fn spawn_post_service_with_store(
    auth_url: &str,
    auth_timeout: Duration,
    store: Arc<dyn PostStore>,
) -> String {
    let auth = AuthClient::new(auth_url, auth_timeout).expect("Failed to build auth client");
    serve(create_post_router(PostState::new(store, auth))).await
}

pub async fn spawn_gateway(auth_url: &str, posts_url: &str, timeout: Duration) -> String {
    let proxy = ProxyClient::new(
        Url::parse(auth_url).unwrap(),
        Url::parse(posts_url).unwrap(),
        timeout,
    )
    .expect("Failed to build proxy client");

    let state = GatewayState {
        proxy: Arc::new(proxy),
    };

    serve(create_gateway_router(
        state,
        &["http://localhost:3000".to_string()],
    ))
    .await
}

/// Auth service + post service wired together, with direct access to the post store.
pub struct Stack {
    pub auth_url: String,
    pub posts_url: String,
    pub store: Arc<dyn PostStore>,
}

pub async fn spawn_stack() -> Stack {
    let auth_url = spawn_auth_service().await;
    let store = post_store().await;
    let posts_url =
        spawn_post_service_with_store(&auth_url, Duration::from_secs(5), store.clone()).await;

    Stack {
        auth_url,
        posts_url,
        store,
    }
}

/// An address nothing listens on.
pub async fn dead_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// A server that answers every request only after `delay`.
pub async fn spawn_slow_server(delay: Duration) -> String {
    let app = Router::new().fallback(move || async move {
        tokio::time::sleep(delay).await;
        axum::Json(serde_json::json!({ "valid": true }))
    });
    serve(app).await
}

pub struct TestUser {
    pub token: String,
    pub user_id: String,
    pub username: String,
}

impl TestUser {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Signs up a fresh user against `signup_url` (the auth service's or the gateway's).
pub async fn signup_at(client: &reqwest::Client, signup_url: &str) -> TestUser {
    // Truncate UUID to keep usernames short
    let username = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);

    let response = client
        .post(signup_url)
        .json(&serde_json::json!({
            "email": format!("{}@example.com", username),
            "username": username,
            "password": "password123"
        }))
        .send()
        .await
        .expect("Signup request failed");
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.expect("Failed to parse signup json");

    TestUser {
        token: body["token"].as_str().expect("Token not found").to_string(),
        user_id: body["user"]["id"].as_str().expect("user id not found").to_string(),
        username,
    }
}

pub async fn signup(client: &reqwest::Client, auth_url: &str) -> TestUser {
    signup_at(client, &format!("{}/api/signup", auth_url)).await
}
