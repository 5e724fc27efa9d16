#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Method, Request, Response};
use axum::Router;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use personal_ledger_api::app::{build_app_with_state, AppState};
use personal_ledger_api::utils::config::AppConfig;
use personal_ledger_api::utils::db_worker::DbWorker;

pub const API_KEY: &str = "test-key-123";

/// Base settings; `overrides` replace or add keys.
pub fn test_config(overrides: &[(&str, &str)]) -> AppConfig {
    let mut env: HashMap<String, String> = [
        ("DATABASE_URL", "postgres://127.0.0.1:1/unreachable"),
        ("API_KEY", API_KEY),
        ("LOG_TO_FILE", "false"),
        ("GMAIL_CLIENT_ID", ""),
        ("KABUTAN_BASE_URL", "http://127.0.0.1:1"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (k, v) in overrides {
        env.insert(k.to_string(), v.to_string());
    }
    AppConfig::from_lookup(move |key| env.get(key).cloned()).expect("test config")
}

/// Router whose pool points at a closed port. Handlers that reach the
/// database fail fast with a pool error instead of hanging.
pub fn build_test_app(config: AppConfig) -> Router {
    let manager = ConnectionManager::<PgConnection>::new(config.database.url.clone());
    let pool = Pool::builder()
        .max_size(1)
        .min_idle(Some(0))
        .connection_timeout(Duration::from_millis(300))
        .build_unchecked(manager);
    let state = AppState::new(DbWorker::new(pool), config).expect("state");
    build_app_with_state(state)
}

pub fn local_peer() -> SocketAddr {
    "127.0.0.1:50000".parse().unwrap()
}

pub struct TestRequest {
    method: Method,
    uri: String,
    api_key: Option<String>,
    peer: Option<SocketAddr>,
    body: Option<Value>,
}

impl TestRequest {
    pub fn new(method: Method, uri: &str) -> Self {
        Self {
            method,
            uri: uri.to_string(),
            api_key: Some(API_KEY.to_string()),
            peer: Some(local_peer()),
            body: None,
        }
    }

    pub fn get(uri: &str) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn post(uri: &str) -> Self {
        Self::new(Method::POST, uri)
    }

    pub fn api_key(mut self, key: Option<&str>) -> Self {
        self.api_key = key.map(String::from);
        self
    }

    pub fn peer(mut self, peer: Option<SocketAddr>) -> Self {
        self.peer = peer;
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub async fn send(self, app: Router) -> Response<Body> {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        if let Some(key) = &self.api_key {
            builder = builder.header("X-Api-Key", key.as_str());
        }
        let body = match self.body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let mut req = builder.body(body).unwrap();
        if let Some(addr) = self.peer {
            req.extensions_mut().insert(ConnectInfo(addr));
        }
        app.oneshot(req).await.unwrap()
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
