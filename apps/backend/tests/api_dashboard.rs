//! Dashboard API tests.

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use common::TestContext;

/// Test dashboard for a user with no words.
#[tokio::test]
async fn test_dashboard_empty() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (_, token) = common::register(&server).await;

    let response = server
        .get("/api/dashboard")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_words"], 0);
    assert_eq!(body["percent_complete"], 0);
    assert_eq!(body["recent"].as_array().unwrap().len(), 0);
}

/// Test dashboard counts follow decisions.
#[tokio::test]
async fn test_dashboard_counts() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (_, token) = common::register(&server).await;
    let known = common::add_word(&server, &token, "red", "kırmızı").await;
    let unknown = common::add_word(&server, &token, "blue", "mavi").await;
    common::add_word(&server, &token, "green", "yeşil").await;

    let session = common::start_session(&server, &token).await;
    let session_id = session["session_id"].as_str().unwrap();
    common::decide(&server, &token, session_id, &known.to_string(), "known")
        .await
        .assert_status_ok();
    common::decide(&server, &token, session_id, &unknown.to_string(), "unknown")
        .await
        .assert_status_ok();

    let response = server
        .get("/api/dashboard")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_words"], 3);
    assert_eq!(body["known_words"], 1);
    assert_eq!(body["unknown_words"], 1);
    assert_eq!(body["not_reviewed"], 1);
    assert_eq!(body["percent_complete"], 33);

    let recent = body["recent"].as_array().unwrap();
    assert_eq!(recent.len(), 2);
    let reviewed: Vec<&str> = recent.iter().filter_map(|r| r["word_id"].as_str()).collect();
    assert!(reviewed.contains(&known.to_string().as_str()));
    assert!(reviewed.contains(&unknown.to_string().as_str()));
}

/// Test progress is per user.
#[tokio::test]
async fn test_dashboard_is_per_user() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (_, alice) = common::register(&server).await;
    let (_, bob) = common::register(&server).await;
    let word_id = common::add_word(&server, &alice, "star", "yıldız").await;

    let session = common::start_session(&server, &alice).await;
    let session_id = session["session_id"].as_str().unwrap();
    common::decide(&server, &alice, session_id, &word_id.to_string(), "known")
        .await
        .assert_status_ok();

    let response = server
        .get("/api/dashboard")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&bob),
        )
        .await;

    let body: Value = response.json();
    assert_eq!(body["total_words"], 1);
    assert_eq!(body["known_words"], 0);
    assert_eq!(body["not_reviewed"], 1);
}

/// Test a read outage maps to 503.
#[tokio::test]
async fn test_dashboard_store_failure() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (_, token) = common::register(&server).await;
    ctx.store().set_fail_reads(true);

    let response = server
        .get("/api/dashboard")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}
