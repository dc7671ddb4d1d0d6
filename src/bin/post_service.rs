// src/bin/post_service.rs

use anyhow::Context;
use social_backend::config::PostConfig;
use social_backend::state::PostState;
use social_backend::utils::auth_client::AuthClient;
use social_backend::{create_post_router, db, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = PostConfig::from_env();
    let _guard = telemetry::init_tracing("post-service", &config.rust_log);

    let store = db::connect_post_store(&config.database_url).await?;
    let auth = AuthClient::new(&config.auth_service_url, config.auth_timeout)
        .context("failed to build auth client")?;
    tracing::info!("Verifying tokens against {}", config.auth_service_url);

    let app = create_post_router(PostState::new(store, auth));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("post-service listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
