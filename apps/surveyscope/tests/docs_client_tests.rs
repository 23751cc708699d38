//! Integration tests for the Google Docs client against a mock server.

#![allow(clippy::unwrap_used, clippy::panic)]

use serde_json::json;
use surveyscope::config::DocsConfig;
use surveyscope::docs_client::{DocsClient, DocsError};
use surveyscope_core::SurveyError;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_create(server: &MockServer, status: u16, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/v1/documents"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_create_document_sends_both_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/documents"))
        .and(header("authorization", "Bearer token-123"))
        .and(body_partial_json(json!({ "title": "Build Survey" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "documentId": "abc" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/documents/abc:batchUpdate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = DocsClient::new(format!("{}/", server.uri()), "token-123");
    let url = client
        .create_document("Build Survey", "# Report\n\nAll good")
        .await
        .unwrap();

    assert_eq!(url, "https://docs.google.com/document/d/abc/edit");
}

#[tokio::test]
async fn test_unauthorized() {
    let server = MockServer::start().await;
    mock_create(&server, 401, json!({ "error": "expired" })).await;

    let client = DocsClient::new(server.uri(), "t");
    let err = client.create_empty("x").await.unwrap_err();
    assert!(matches!(err, DocsError::Unauthorized));
}

#[tokio::test]
async fn test_rate_limited() {
    let server = MockServer::start().await;
    mock_create(&server, 429, json!({})).await;

    let client = DocsClient::new(server.uri(), "t");
    let err = client.create_empty("x").await.unwrap_err();
    assert!(matches!(err, DocsError::RateLimited));
}

#[tokio::test]
async fn test_api_error_keeps_status() {
    let server = MockServer::start().await;
    mock_create(&server, 500, json!({ "error": "backend" })).await;

    let client = DocsClient::new(server.uri(), "t");
    match client.create_empty("x").await.unwrap_err() {
        DocsError::Api(status, body) => {
            assert_eq!(status, 500);
            assert!(body.contains("backend"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_missing_document_id_is_parse_error() {
    let server = MockServer::start().await;
    mock_create(&server, 200, json!({ "title": "no id" })).await;

    let client = DocsClient::new(server.uri(), "t");
    let err = client.create_empty("x").await.unwrap_err();
    assert!(matches!(err, DocsError::Parse(_)));
}

#[tokio::test]
async fn test_unreachable_server() {
    let client = DocsClient::new("http://127.0.0.1:1", "t");
    let err = client.create_empty("x").await.unwrap_err();
    assert!(matches!(err, DocsError::ConnectionFailed(_)));
}

#[test]
fn test_from_config_requires_token() {
    let config = DocsConfig::default();
    assert!(matches!(
        DocsClient::from_config(&config),
        Err(DocsError::MissingToken)
    ));

    let config = DocsConfig {
        access_token: Some("   ".to_string()),
        ..DocsConfig::default()
    };
    assert!(DocsClient::from_config(&config).is_err());

    let config = DocsConfig {
        access_token: Some("t".to_string()),
        ..DocsConfig::default()
    };
    assert!(DocsClient::from_config(&config).is_ok());
}

#[test]
fn test_docs_error_maps_to_survey_error() {
    assert!(matches!(
        SurveyError::from(DocsError::MissingToken),
        SurveyError::Config(_)
    ));
    assert!(matches!(
        SurveyError::from(DocsError::Unauthorized),
        SurveyError::IoError(_)
    ));
}
