use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ok_for_health_check(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();

    response.assert_status(StatusCode::OK);

    // Health endpoint returns plain text
    let body = String::from_utf8(response.body_bytes.clone()).unwrap();
    assert_eq!(body, "OK");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_synthesizer_state_when_ready(ctx: &TestContext) {
    ctx.client
        .post("/synthesize", &json!({ "text": "warm up" }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let response = ctx.client.get("/health/ready").await.unwrap();
    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body.get("status").and_then(|v| v.as_str()), Some("ready"));
    assert_eq!(body.get("tts").and_then(|v| v.as_str()), Some("fake"));
    assert_eq!(body.get("rate_window_in_use").and_then(|v| v.as_u64()), Some(1));
    assert!(body.get("cache_entries").is_some());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_include_request_id_in_responses(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();
    response.assert_header_exists("x-request-id");

    let response = ctx.client.post("/synthesize", &json!({})).await.unwrap();
    response.assert_header_exists("x-request-id");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_echo_caller_request_id(ctx: &TestContext) {
    let response = ctx
        .client
        .get_with_headers("/health", &[("x-request-id", "trace-42")])
        .await
        .unwrap();

    assert_eq!(response.header("x-request-id"), Some("trace-42"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_allow_any_origin(ctx: &TestContext) {
    let response = ctx
        .client
        .options(
            "/synthesize",
            &[
                ("Origin", "http://example.com"),
                ("Access-Control-Request-Method", "POST"),
                ("Access-Control-Request-Headers", "content-type"),
            ],
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.header("access-control-allow-origin"), Some("*"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_404_for_unknown_routes(ctx: &TestContext) {
    let response = ctx.client.get("/does-not-exist").await.unwrap();
    response.assert_status(StatusCode::NOT_FOUND);
}
