// src/bin/auth_service.rs

use anyhow::Context;
use social_backend::config::AuthConfig;
use social_backend::state::AuthState;
use social_backend::utils::jwt::TokenCodec;
use social_backend::{create_auth_router, db, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AuthConfig::from_env();
    let _guard = telemetry::init_tracing("auth-service", &config.rust_log);

    let users = db::connect_user_store(&config.database_url).await?;

    let state = AuthState {
        users,
        tokens: TokenCodec::new(&config.jwt_secret, config.jwt_expiration),
    };

    let app = create_auth_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("auth-service listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
