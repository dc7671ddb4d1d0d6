// src/config.rs

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use dotenvy::dotenv;
use url::Url;

const DEFAULT_AUTH_SERVICE_URL: &str = "http://localhost:4001";
const DEFAULT_POST_SERVICE_URL: &str = "http://localhost:4002";

/// Configuration of the auth service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub port: u16,
    pub rust_log: String,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(7 * 24 * 60 * 60);

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            port: port_or(4001),
            rust_log: rust_log(),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Configuration of the post service.
#[derive(Debug, Clone)]
pub struct PostConfig {
    pub database_url: String,
    /// Base URL of the auth service hosting `/api/verify`.
    pub auth_service_url: String,
    pub auth_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl PostConfig {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let auth_service_url = service_url("AUTH_SERVICE_URL", DEFAULT_AUTH_SERVICE_URL);

        Self {
            database_url,
            auth_service_url: auth_service_url.to_string(),
            auth_timeout: millis_or("AUTH_TIMEOUT_MS", 5_000),
            port: port_or(4002),
            rust_log: rust_log(),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Configuration of the gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub auth_service_url: Url,
    pub post_service_url: Url,
    pub upstream_timeout: Duration,
    pub cors_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        dotenv().ok();

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Self {
            auth_service_url: service_url("AUTH_SERVICE_URL", DEFAULT_AUTH_SERVICE_URL),
            post_service_url: service_url("POST_SERVICE_URL", DEFAULT_POST_SERVICE_URL),
            upstream_timeout: millis_or("UPSTREAM_TIMEOUT_MS", 10_000),
            cors_origins,
            port: port_or(4000),
            rust_log: rust_log(),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn service_url(key: &str, default: &str) -> Url {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).unwrap_or_else(|e| panic!("{} is not a valid URL ({}): {}", key, raw, e))
}

fn millis_or(key: &str, default: u64) -> Duration {
    let millis = env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default);
    Duration::from_millis(millis)
}

fn port_or(default: u16) -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn rust_log() -> String {
    env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
}
