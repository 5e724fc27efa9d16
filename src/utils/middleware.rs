use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tower_http::cors::{Any, CorsLayer};

use crate::app::AppState;
use crate::handler::error::AppError;

pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let from_env: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    if !from_env.is_empty() {
        CorsLayer::new()
            .allow_origin(from_env)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin([
                HeaderValue::from_static("http://localhost:5173"),
                HeaderValue::from_static("http://127.0.0.1:5173"),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Exact, case-sensitive comparison of the presented key with the configured one.
pub fn api_key_matches(provided: Option<&str>, expected: &str) -> bool {
    match provided {
        Some(key) if !key.is_empty() && !expected.is_empty() => key == expected,
        _ => false,
    }
}

pub fn is_loopback_peer(ip: IpAddr) -> bool {
    ip.to_canonical().is_loopback()
}

/// APIキー認証
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth = &state.config.auth;
    if auth.test_mode {
        tracing::warn!("API key authentication is disabled in test mode");
        return Ok(next.run(req).await);
    }

    let provided = req
        .headers()
        .get(auth.header_name.as_str())
        .and_then(|v| v.to_str().ok());
    if provided.is_none() {
        return Err(AppError::Unauthorized("API key was not provided.".to_string()));
    }
    if !api_key_matches(provided, &auth.api_key) {
        tracing::warn!("rejected request with invalid API key: {} {}", req.method(), req.uri().path());
        return Err(AppError::Unauthorized("Invalid API key.".to_string()));
    }
    Ok(next.run(req).await)
}

/// ローカルからのアクセスのみ許可
pub async fn require_loopback(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !state.config.auth.local_only {
        return Ok(next.run(req).await);
    }

    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    match peer {
        Some(ip) if is_loopback_peer(ip) => Ok(next.run(req).await),
        other => {
            tracing::warn!("rejected non-local peer {:?}", other);
            Err(AppError::Forbidden(
                "Forbidden: only local requests are allowed.".to_string(),
            ))
        }
    }
}
