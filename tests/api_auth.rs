//! Router-level tests for authentication, peer checks and request validation.
//! None of these reach the database.

mod common;

use axum::http::StatusCode;
use common::{body_json, body_text, build_test_app, test_config, TestRequest};
use serde_json::json;

#[tokio::test]
async fn healthz_needs_no_key() {
    let app = build_test_app(test_config(&[]));
    let response = TestRequest::get("/healthz").api_key(None).peer(None).send(app).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn missing_api_key_is_401() {
    let app = build_test_app(test_config(&[]));
    let response = TestRequest::get("/api/stocks").api_key(None).send(app).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["status"], "unauthorized");
    assert_eq!(body["message"], "API key was not provided.");
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn wrong_api_key_is_401() {
    let app = build_test_app(test_config(&[]));
    let response = TestRequest::get("/api/stocks")
        .api_key(Some("TEST-KEY-123"))
        .send(app)
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid API key.");
}

#[tokio::test]
async fn custom_header_name_is_honoured() {
    let app = build_test_app(test_config(&[("API_KEY_HEADER", "X-Ledger-Key")]));
    // the default header is ignored when a custom one is configured
    let response = TestRequest::get("/api/kabutan/stock/abc").send(app).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn remote_peer_is_403() {
    let app = build_test_app(test_config(&[]));
    let response = TestRequest::get("/api/kabutan/stock/7203")
        .peer(Some("192.168.1.20:40000".parse().unwrap()))
        .send(app)
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["status"], "forbidden");
}

#[tokio::test]
async fn unknown_peer_is_403() {
    let app = build_test_app(test_config(&[]));
    let response = TestRequest::get("/api/kabutan/stock/7203").peer(None).send(app).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn api_key_is_checked_before_peer() {
    let app = build_test_app(test_config(&[]));
    let response = TestRequest::get("/api/stocks")
        .api_key(None)
        .peer(Some("10.0.0.5:1234".parse().unwrap()))
        .send(app)
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn local_only_can_be_disabled() {
    let app = build_test_app(test_config(&[("LOCAL_ONLY", "false")]));
    let response = TestRequest::get("/api/kabutan/stock/72")
        .peer(Some("10.0.0.5:1234".parse().unwrap()))
        .send(app)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mode_skips_api_key() {
    let app = build_test_app(test_config(&[("APP_TEST_MODE", "true")]));
    let response = TestRequest::get("/api/kabutan/stock/12ab").api_key(None).send(app).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn kabutan_rejects_malformed_code() {
    let app = build_test_app(test_config(&[]));
    let response = TestRequest::get("/api/kabutan/stock/123456").send(app).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["status"], "bad_request");
    assert_eq!(body["message"], "証券コードは4桁または5桁の数字で指定してください。");
}

#[tokio::test]
async fn kabutan_upstream_failure_is_502() {
    // KABUTAN_BASE_URL points at a closed port
    let app = build_test_app(test_config(&[]));
    let response = TestRequest::get("/api/kabutan/stock/7203").send(app).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn batchlog_malformed_uuid_is_400() {
    let app = build_test_app(test_config(&[]));
    let response = TestRequest::get("/api/batchlogs/not-a-uuid").send(app).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Invalid uuid: 'not-a-uuid'.");
}

#[tokio::test]
async fn batchlog_search_rejects_unknown_status() {
    let app = build_test_app(test_config(&[]));
    let response = TestRequest::get("/api/batchlogs/search?status=Finished").send(app).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn batchlog_begin_requires_program_id() {
    let app = build_test_app(test_config(&[]));
    let response = TestRequest::post("/api/batchlogs/begin")
        .json(json!({"programId": "  ", "userName": "tester"}))
        .send(app)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "programId is required.");
}

#[tokio::test]
async fn batchlog_log_requires_uuid() {
    let app = build_test_app(test_config(&[]));
    let response = TestRequest::post("/api/batchlogs/log")
        .json(json!({"logMsg": "step 1"}))
        .send(app)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "uuid is required.");
}

#[tokio::test]
async fn salary_range_must_be_year_month() {
    let app = build_test_app(test_config(&[]));
    let response = TestRequest::get("/api/salaries?startYm=2025-01").send(app).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["status"], "bad_request");
}

#[tokio::test]
async fn salary_upload_rejects_bad_month() {
    let app = build_test_app(test_config(&[]));
    let response = TestRequest::post("/api/salaries/upload")
        .json(json!([
            {"month": "202513", "deduction": false, "paymentItem": "基本給", "money": {"amount": 300000}}
        ]))
        .send(app)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_upload_writes_nothing() {
    let app = build_test_app(test_config(&[]));
    let response = TestRequest::post("/api/salaries/upload").json(json!([])).send(app).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"], 0);
}

#[tokio::test]
async fn stock_upload_requires_code_and_name() {
    let app = build_test_app(test_config(&[]));
    let response = TestRequest::post("/api/stocks/upload")
        .json(json!([
            {"code": "7203", "name": "", "quantity": "100", "purchasePrice": "2500"}
        ]))
        .send(app)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn gmail_without_credentials_is_500() {
    let app = build_test_app(test_config(&[]));
    let response = TestRequest::get("/api/gmail/salaries/latest").send(app).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Internal server error: Gmail credentials are not configured"));
}

#[tokio::test]
async fn unreachable_database_is_500() {
    let app = build_test_app(test_config(&[]));
    let response = TestRequest::get("/api/stocks").send(app).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["status"], "error");
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn missing_json_field_is_400_envelope() {
    let app = build_test_app(test_config(&[]));
    let response = TestRequest::post("/api/stocks/upload")
        .json(json!([{"code": "7203", "name": "トヨタ"}]))
        .send(app)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["status"], "bad_request");
    assert!(body["message"].as_str().unwrap().contains("quantity"));
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn malformed_json_body_is_400_envelope() {
    let app = build_test_app(test_config(&[]));
    let response = TestRequest::post("/api/batchlogs/begin")
        .json(json!("not an object"))
        .send(app)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["status"], "bad_request");
}

#[tokio::test]
async fn salary_upload_rejects_bad_currency() {
    let app = build_test_app(test_config(&[]));
    let response = TestRequest::post("/api/salaries/upload")
        .json(json!([
            {"month": "202506", "paymentItem": "基本給", "money": {"amount": 1, "currencyCode": "YEN1"}}
        ]))
        .send(app)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["status"], "bad_request");
    assert!(body["message"].as_str().unwrap().contains("invalid currency code"));
}
