// crates/ruleforge-client/src/tests/api.rs
// ============================================================================
// Module: API Client Tests
// Description: Request shapes and error normalization against a live socket.
// Purpose: Ensure each operation issues one well-formed request.
// Dependencies: ruleforge-client api, test support server
// ============================================================================

//! ## Overview
//! Validates paths, query strings, bodies, multipart uploads, and the
//! message chosen for non-2xx responses.

use hyper::Method;
use hyper::StatusCode;
use reqwest::StatusCode as ReqwestStatus;
use ruleforge_config::ApiConfig;
use ruleforge_core::HitlAction;
use ruleforge_core::HitlDecision;
use ruleforge_core::RunRequest;
use serde_json::json;

use crate::api::ApiClient;
use crate::api::ApiError;
use crate::api::MAX_RESPONSE_BYTES;
use crate::api::error_message;
use crate::document::PdfDocument;
use crate::tests::support::TestHttpServer;
use crate::tests::support::TestResponse;

fn client_for(server: &TestHttpServer) -> ApiClient {
    ApiClient::new(&ApiConfig {
        base_url: format!("{}/", server.url()),
        timeout_ms: Some(5_000),
    })
    .expect("client")
}

#[test]
fn error_message_prefers_json_error_field() {
    let body = br#"{"error": "No PDF uploaded"}"#;
    assert_eq!(error_message(ReqwestStatus::BAD_REQUEST, body), "No PDF uploaded");
}

#[test]
fn error_message_uses_http_code_for_json_without_error() {
    assert_eq!(error_message(ReqwestStatus::INTERNAL_SERVER_ERROR, b"{}"), "HTTP 500");
    assert_eq!(error_message(ReqwestStatus::BAD_GATEWAY, br#"{"error": ""}"#), "HTTP 502");
}

#[test]
fn error_message_uses_reason_phrase_for_non_json() {
    assert_eq!(error_message(ReqwestStatus::NOT_FOUND, b"<html>"), "Not Found");
    let unknown = ReqwestStatus::from_u16(599).unwrap();
    assert_eq!(error_message(unknown, b""), "HTTP 599");
}

#[test]
fn client_rejects_invalid_base_url() {
    let err = ApiClient::new(&ApiConfig {
        base_url: "not a url".to_string(),
        timeout_ms: None,
    })
    .unwrap_err();
    assert!(matches!(err, ApiError::Config(_)));
}

#[test]
fn export_links_are_built_not_fetched() {
    let client = ApiClient::new(&ApiConfig::default()).unwrap();
    assert_eq!(client.violations_export_url(), "http://localhost:5000/api/export/violations");
    assert_eq!(client.report_url(), "http://localhost:5000/api/export/report");
}

#[tokio::test]
async fn reads_use_expected_paths_and_queries() {
    let server = TestHttpServer::start(|request| match request.path.as_str() {
        "/api/stats" => TestResponse::json(&json!({"total_rules": 4, "rules_triggered": 2})),
        "/api/rules" => TestResponse::json(&json!({"rules": [{"id": "R1"}], "types": ["threshold"]})),
        "/api/violations" => TestResponse::json(&json!({"violations": []})),
        "/api/audit-log" => TestResponse::json(&json!({"logs": [], "stats": {}})),
        "/api/versions/3" => TestResponse::json(&json!({"version": 3, "rules": []})),
        "/api/pipeline-status" => {
            TestResponse::json(&json!({"running": true, "log_lines": ["x"]}))
        }
        _ => TestResponse::json_status(StatusCode::NOT_FOUND, &json!({"error": "missing"})),
    })
    .await;
    let client = client_for(&server);

    assert_eq!(client.stats().await.unwrap().total_rules, 4);
    let rules = client.rules(&[("type", "threshold"), ("q", "a b")]).await.unwrap();
    assert_eq!(rules.rules[0].id, "R1");
    assert!(client.violations().await.unwrap().violations.is_empty());
    client.audit_log(50).await.unwrap();
    assert_eq!(client.version(3).await.unwrap().version, Some(3));
    assert_eq!(client.pipeline_status(12).await.unwrap().log_lines, vec!["x"]);

    let requests = server.requests().await;
    let seen: Vec<(String, Option<String>)> =
        requests.iter().map(|request| (request.path.clone(), request.query.clone())).collect();
    assert_eq!(
        seen,
        vec![
            ("/api/stats".to_string(), None),
            ("/api/rules".to_string(), Some("type=threshold&q=a+b".to_string())),
            ("/api/violations".to_string(), Some("sort=desc".to_string())),
            ("/api/audit-log".to_string(), Some("limit=50".to_string())),
            ("/api/versions/3".to_string(), None),
            ("/api/pipeline-status".to_string(), Some("offset=12".to_string())),
        ]
    );
    assert!(requests.iter().all(|request| request.method == Method::GET));
    server.shutdown().await;
}

#[tokio::test]
async fn writes_send_json_bodies() {
    let server = TestHttpServer::start(|request| match request.path.as_str() {
        "/api/run" => TestResponse::json(&json!({"status": "started"})),
        _ => TestResponse::json(&json!({"ok": true})),
    })
    .await;
    let client = client_for(&server);

    let decision = HitlDecision {
        rule_id: "R9".to_string(),
        action: HitlAction::Escalate,
        analyst: "jo".to_string(),
        notes: String::new(),
    };
    client.submit_hitl_decision(&decision).await.unwrap();
    let ack = client
        .start_run(&RunRequest {
            phase: "2".to_string(),
            pdf: None,
        })
        .await
        .unwrap();
    assert_eq!(ack.status.as_deref(), Some("started"));

    let requests = server.requests().await;
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(
        requests[0].json(),
        json!({"rule_id": "R9", "action": "ESCALATE", "analyst": "jo", "notes": ""})
    );
    assert_eq!(requests[0].header("content-type").as_deref(), Some("application/json"));
    assert_eq!(requests[1].path, "/api/run");
    assert_eq!(requests[1].json(), json!({"phase": "2", "pdf": null}));
    server.shutdown().await;
}

#[tokio::test]
async fn upload_sends_multipart_file_field() {
    let server =
        TestHttpServer::start(|_| TestResponse::json(&json!({"filename": "policy_v2.pdf"}))).await;
    let client = client_for(&server);
    let document = PdfDocument::new("policy.pdf", b"%PDF-1.7 body".to_vec()).unwrap();

    let receipt = client.upload(&document).await.unwrap();
    assert_eq!(receipt.filename, "policy_v2.pdf");

    let requests = server.requests().await;
    let content_type = requests[0].header("content-type").unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"file\"; filename=\"policy.pdf\""));
    assert!(body.contains("%PDF-1.7 body"));
    server.shutdown().await;
}

#[tokio::test]
async fn non_success_status_is_normalized() {
    let server = TestHttpServer::start(|request| match request.path.as_str() {
        "/api/stats" => {
            TestResponse::json_status(StatusCode::BAD_REQUEST, &json!({"error": "bad phase"}))
        }
        _ => TestResponse::text(StatusCode::SERVICE_UNAVAILABLE, "down"),
    })
    .await;
    let client = client_for(&server);

    match client.stats().await {
        Err(ApiError::Status {
            status,
            message,
        }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "bad phase");
        }
        other => panic!("expected status error, got {other:?}"),
    }
    let err = client.versions().await.unwrap_err();
    assert_eq!(err.to_string(), "Service Unavailable");
    server.shutdown().await;
}

#[tokio::test]
async fn malformed_success_body_is_a_json_error() {
    let server = TestHttpServer::start(|_| TestResponse::text(StatusCode::OK, "not json")).await;
    let client = client_for(&server);
    assert!(matches!(client.live_status().await, Err(ApiError::Json(_))));
    server.shutdown().await;
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let payload = "a".repeat(MAX_RESPONSE_BYTES + 1);
    let server = TestHttpServer::start(move |_| TestResponse::text(StatusCode::OK, &payload)).await;
    let client = client_for(&server);
    assert!(matches!(client.explanations().await, Err(ApiError::ResponseTooLarge { .. })));
    server.shutdown().await;
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let server = TestHttpServer::start(|_| TestResponse::json(&json!({}))).await;
    let client = client_for(&server);
    server.shutdown().await;
    assert!(matches!(client.stats().await, Err(ApiError::Transport(_))));
}
