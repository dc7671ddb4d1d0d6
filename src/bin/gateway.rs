// src/bin/gateway.rs

use std::sync::Arc;

use anyhow::Context;
use social_backend::config::GatewayConfig;
use social_backend::proxy::ProxyClient;
use social_backend::state::GatewayState;
use social_backend::{create_gateway_router, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::from_env();
    let _guard = telemetry::init_tracing("gateway", &config.rust_log);

    let proxy = ProxyClient::new(
        config.auth_service_url.clone(),
        config.post_service_url.clone(),
        config.upstream_timeout,
    )
    .context("failed to build upstream client")?;
    tracing::info!(
        auth = %config.auth_service_url,
        posts = %config.post_service_url,
        "Forwarding to upstreams"
    );

    let state = GatewayState {
        proxy: Arc::new(proxy),
    };
    let app = create_gateway_router(state, &config.cors_origins);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("gateway listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
