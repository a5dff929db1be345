use crate::e2e::helpers;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use helpers::{start_app, FailingTtsRepository, TestContext, FAKE_MP3};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use test_context::test_context;
use tts_gateway::domain::tts::AudioFormat;
use tts_gateway::infrastructure::repositories::FakeTtsRepository;

const MP3_PREFIX: &str = "data:audio/mp3;base64,";

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_base64_data_uri(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/synthesize", &json!({ "text": "hello", "lang": "en" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let audio = response.json_str("audio_base64").expect("Missing audio_base64");
    assert!(audio.starts_with(MP3_PREFIX), "unexpected prefix: {}", audio);

    let payload = &audio[MP3_PREFIX.len()..];
    assert!(!payload.is_empty());
    assert_eq!(STANDARD.decode(payload).unwrap(), FAKE_MP3);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_default_language_and_response_type(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/synthesize", &json!({ "text": "hello" }))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);

    // Same key as an explicit "en" request, so it is a cache hit
    let response = ctx
        .client
        .post(
            "/synthesize",
            &json!({ "text": "hello", "lang": "en", "response_type": "base64" }),
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);

    assert_eq!(ctx.fake.call_count(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_serve_repeated_requests_from_cache(ctx: &TestContext) {
    let body = json!({ "text": "cache me", "lang": "en" });

    let first = ctx.client.post("/synthesize", &body).await.unwrap();
    let second = ctx.client.post("/synthesize", &body).await.unwrap();

    first.assert_status(StatusCode::OK);
    second.assert_status(StatusCode::OK);
    assert_eq!(first.body_bytes, second.body_bytes);
    assert_eq!(ctx.fake.call_count(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_cache_languages_independently(ctx: &TestContext) {
    for lang in ["en", "hi", "kn", "en"] {
        ctx.client
            .post("/synthesize", &json!({ "text": "namaste", "lang": lang }))
            .await
            .unwrap()
            .assert_status(StatusCode::OK);
    }

    assert_eq!(ctx.fake.call_count(), 3);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_text(ctx: &TestContext) {
    let response = ctx.client.post("/synthesize", &json!({})).await.unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Text parameter is required");
    assert_eq!(response.body, Some(json!({ "error": "Text parameter is required" })));
    assert_eq!(ctx.fake.call_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_empty_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/synthesize", &json!({ "text": "" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Text parameter is required");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_whitespace_only_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/synthesize", &json!({ "text": " ".repeat(101) }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Text parameter is required");
    assert_eq!(ctx.fake.call_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unsupported_response_type(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/synthesize", &json!({ "text": "hi", "response_type": "wav" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Unsupported response_type");
    assert_eq!(ctx.fake.call_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_json(ctx: &TestContext) {
    let response = ctx
        .client
        .post_raw("/synthesize", "{\"text\": ", "application/json")
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Invalid JSON body");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_text_of_wrong_type(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/synthesize", &json!({ "text": 42 }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Invalid JSON body");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_enforce_text_length_limit(ctx: &TestContext) {
    let long_text = "a".repeat(10_001);
    let response = ctx
        .client
        .post("/synthesize", &json!({ "text": long_text }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::PAYLOAD_TOO_LARGE)
        .assert_error("Text must be 10000 characters or less");
}

#[tokio::test]
async fn it_should_return_500_when_retries_are_exhausted() {
    let backend = Arc::new(FailingTtsRepository::new());
    let client = start_app(backend.clone()).await;

    let response = client
        .post("/synthesize", &json!({ "text": "hello" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error("Internal server error");
    let message = response.json_str("message").expect("Missing message");
    assert_eq!(
        message,
        "synthesis failed after 5 attempts: engine unavailable (call 5)"
    );
    assert_eq!(backend.call_count(), 5);
}

#[tokio::test]
async fn it_should_use_backend_mime_type() {
    let backend = Arc::new(FakeTtsRepository::silent().unwrap());
    let client = start_app(backend).await;

    let response = client
        .post("/synthesize", &json!({ "text": "hello" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let audio = response.json_str("audio_base64").unwrap();
    assert!(audio.starts_with("data:audio/wav;base64,UklGR"), "{}", audio);
}

#[tokio::test]
async fn it_should_share_one_backend_call_between_concurrent_requests() {
    let backend = Arc::new(FakeTtsRepository::new(b"abc".to_vec(), AudioFormat::Mp3));
    let client = start_app(backend.clone()).await;

    let requests = (0..5).map(|_| {
        let client = client.clone();
        async move {
            client
                .post("/synthesize", &json!({ "text": "same text", "lang": "en" }))
                .await
                .unwrap()
        }
    });
    let responses = futures::future::join_all(requests).await;

    for response in &responses {
        response.assert_status(StatusCode::OK);
        assert_eq!(response.json_str("audio_base64"), Some("data:audio/mp3;base64,YWJj"));
    }
    assert_eq!(backend.call_count(), 1);
}
