// src/proxy.rs

//! Upstream selection and request forwarding for the gateway.
//!
//! Routing rules:
//! - /api/auth/<rest>  → auth service  /api/<rest>
//! - /api/posts[/...]  → post service  (same path)
//! - anything else     → no upstream

use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Method, header},
    response::Response,
};
use url::Url;

use crate::error::AppError;

/// The backend a request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Auth,
    Posts,
}

/// Maps a public gateway path to its upstream and the path on that upstream.
pub fn resolve(path: &str) -> Option<(Upstream, String)> {
    if let Some(rest) = path.strip_prefix("/api/auth/") {
        if rest.is_empty() {
            return None;
        }
        return Some((Upstream::Auth, format!("/api/{}", rest)));
    }

    if path == "/api/posts" || path.starts_with("/api/posts/") {
        return Some((Upstream::Posts, path.to_string()));
    }

    None
}

/// Forwards requests to the backend services and relays their answers untouched.
pub struct ProxyClient {
    http: reqwest::Client,
    auth_url: Url,
    posts_url: Url,
}

impl ProxyClient {
    pub fn new(auth_url: Url, posts_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self {
            http,
            auth_url,
            posts_url,
        })
    }

    fn base_url(&self, upstream: Upstream) -> &Url {
        match upstream {
            Upstream::Auth => &self.auth_url,
            Upstream::Posts => &self.posts_url,
        }
    }

    /// Sends method, body, `Content-Type` and `Authorization` to the upstream and
    /// returns its status, `Content-Type` and body as-is.
    ///
    /// Never makes up a response: a failed exchange is an [`AppError::Gateway`].
    pub async fn forward(
        &self,
        upstream: Upstream,
        path: &str,
        query: Option<&str>,
        method: Method,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let base = self.base_url(upstream).as_str().trim_end_matches('/');
        let target_url = match query {
            Some(query) => format!("{}{}?{}", base, path, query),
            None => format!("{}{}", base, path),
        };

        let mut request = self.http.request(method.clone(), &target_url);
        for name in [header::AUTHORIZATION, header::CONTENT_TYPE] {
            if let Some(value) = headers.get(&name) {
                request = request.header(name, value);
            }
        }
        if !body.is_empty() {
            request = request.body(body);
        }

        let upstream_response = request.send().await.map_err(|e| {
            AppError::Gateway(format!("{} {} failed: {}", method, target_url, e))
        })?;

        let status = upstream_response.status();
        let content_type = upstream_response.headers().get(header::CONTENT_TYPE).cloned();
        let payload = upstream_response.bytes().await.map_err(|e| {
            AppError::Gateway(format!("reading {} {} response failed: {}", method, target_url, e))
        })?;

        tracing::debug!(%method, %target_url, %status, "Relayed upstream response");

        let mut response = axum::http::Response::builder().status(status);
        if let Some(content_type) = content_type {
            response = response.header(header::CONTENT_TYPE, content_type);
        }
        response
            .body(Body::from(payload))
            .map_err(|e| AppError::Gateway(e.to_string()))
    }
}
