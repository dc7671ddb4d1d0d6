// src/handlers/mod.rs

pub mod auth;
pub mod gateway;
pub mod likes;
pub mod posts;

use axum::Json;
use serde_json::{Value, json};

/// Liveness probe; answers without touching storage or other services.
pub fn health(service: &'static str) -> Json<Value> {
    Json(json!({ "status": "ok", "service": service }))
}
