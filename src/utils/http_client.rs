use std::time::Duration;

use reqwest::{Client, header::{HeaderMap, HeaderValue, USER_AGENT, ACCEPT, ACCEPT_LANGUAGE}};

/// Shared client for upstream calls (Gmail API, kabutan.jp).
/// Sends browser-like headers because kabutan serves a reduced page to unknown agents.
pub fn create_client() -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        ),
    );
    headers.insert(ACCEPT, HeaderValue::from_static("text/html,application/json;q=0.9,*/*;q=0.8"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("ja,en;q=0.8"));

    Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(30))
        .build()
}
