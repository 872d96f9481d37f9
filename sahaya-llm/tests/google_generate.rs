use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;
use sahaya_llm::{GenerationError, GoogleClient, Llm};

#[tokio::test]
async fn google_generate_sends_single_user_turn() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-2.0-flash-exp:generateContent")
            .query_param("key", "test-key")
            .json_body(json!({
                "contents": [
                    {
                        "role": "user",
                        "parts": [{"text": "Rules\n\nContext: A\n\nUser Question: hi"}]
                    }
                ]
            }));
        then.status(200).json_body(json!({
            "candidates": [
                {
                    "content": {
                        "role": "model",
                        "parts": [{"text": "Hello! "}, {"text": "How can I help?"}]
                    },
                    "finishReason": "STOP"
                }
            ]
        }));
    });

    let client =
        GoogleClient::new("test-key", "gemini-2.0-flash-exp").with_base_url(server.url(""));

    let answer = client
        .generate("Rules\n\nContext: A\n\nUser Question: hi")
        .await
        .unwrap();
    assert_eq!(answer, "Hello! How can I help?");
    mock.assert();
}

#[tokio::test]
async fn google_generate_maps_api_error_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-2.0-flash-exp:generateContent");
        then.status(403).json_body(json!({
            "error": {"code": 403, "message": "Permission denied"}
        }));
    });

    let client =
        GoogleClient::new("test-key", "models/gemini-2.0-flash-exp").with_base_url(server.url(""));

    let err = client.generate("prompt").await.unwrap_err();
    assert!(matches!(err, GenerationError::Provider(ref message) if message == "Permission denied"));
}

#[tokio::test]
async fn google_generate_without_candidates_fails() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(json!({
            "promptFeedback": {"blockReason": "OTHER"}
        }));
    });

    let client =
        GoogleClient::new("test-key", "gemini-2.0-flash-exp").with_base_url(server.url(""));

    let err = client.generate("prompt").await.unwrap_err();
    assert!(matches!(err, GenerationError::NoCandidates));
}

#[tokio::test]
async fn google_generate_reports_blocked_candidate() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }));
    });

    let client =
        GoogleClient::new("test-key", "gemini-2.0-flash-exp").with_base_url(server.url(""));

    let err = client.generate("prompt").await.unwrap_err();
    assert!(matches!(err, GenerationError::Blocked(ref reason) if reason == "SAFETY"));
}

#[tokio::test]
async fn google_generate_times_out() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST);
        then.status(200)
            .delay(Duration::from_millis(500))
            .json_body(json!({
                "candidates": [{"content": {"parts": [{"text": "late"}]}}]
            }));
    });

    let client = GoogleClient::new("test-key", "gemini-2.0-flash-exp")
        .with_base_url(server.url(""))
        .with_timeout(Duration::from_millis(50));

    let err = client.generate("prompt").await.unwrap_err();
    assert!(matches!(err, GenerationError::Timeout(_)));
}
