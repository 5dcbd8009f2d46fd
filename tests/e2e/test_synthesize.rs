use crate::e2e::helpers;

use helpers::fake_vendor::{VendorReply, FAKE_AUDIO};
use helpers::{TestContext, TestOptions, TEST_API_KEY};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;
use tts_maker::domain::catalog::MAX_TEXT_LENGTH;
use tts_maker::domain::tts::result::decode_base64;
use tts_maker::domain::tts::SynthesisMode;
use tts_maker::infrastructure::config::Environment;

const SYNTHESIZE: &str = "/api/synthesize";

fn hello_request() -> serde_json::Value {
    json!({
        "input": "Hello world",
        "model": "FunAudioLLM/CosyVoice2-0.5B",
        "voice": "FunAudioLLM/CosyVoice2-0.5B:anna",
        "speed": 1.0,
        "gain": 0,
        "response_format": "mp3",
        "sample_rate": 44100
    })
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_inline_audio(ctx: &TestContext) {
    let response = ctx.client.post(SYNTHESIZE, &hello_request()).await.unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body["success"], json!(true));

    let data = &body["data"];
    assert_eq!(data["format"], json!("mp3"));
    assert_eq!(data["mimeType"], json!("audio/mpeg"));
    assert!(data.get("createdAt").and_then(|v| v.as_str()).is_some());
    assert!(data.get("audioUrl").is_none());

    let audio = decode_base64(data["audioContent"].as_str().unwrap()).unwrap();
    assert_eq!(audio, FAKE_AUDIO);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_forward_request_to_vendor_with_credential(ctx: &TestContext) {
    ctx.client.post(SYNTHESIZE, &hello_request()).await.unwrap();

    let requests = ctx.vendor.requests();
    assert_eq!(requests.len(), 1);

    let recorded = &requests[0];
    assert_eq!(
        recorded.authorization.as_deref(),
        Some(format!("Bearer {}", TEST_API_KEY).as_str())
    );
    assert_eq!(recorded.body["input"], json!("<|endofprompt|>Hello world"));
    assert_eq!(recorded.body["model"], json!("FunAudioLLM/CosyVoice2-0.5B"));
    assert_eq!(recorded.body["voice"], json!("FunAudioLLM/CosyVoice2-0.5B:anna"));
    assert_eq!(recorded.body["response_format"], json!("mp3"));
    assert_eq!(recorded.body["sample_rate"], json!(44100));
    assert_eq!(recorded.body["stream"], json!(false));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_apply_defaults_for_missing_fields(ctx: &TestContext) {
    let response = ctx
        .client
        .post(SYNTHESIZE, &json!({ "input": "Hi" }))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);

    let body = &ctx.vendor.requests()[0].body;
    assert_eq!(body["model"], json!("FunAudioLLM/CosyVoice2-0.5B"));
    assert_eq!(body["response_format"], json!("mp3"));
    assert_eq!(body["speed"], json!(1.0));
    assert!(body.get("sample_rate").is_none());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_substitute_unsupported_sample_rate(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            SYNTHESIZE,
            &json!({ "input": "Hi", "response_format": "opus", "sample_rate": 44100 }),
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body["data"]["mimeType"], json!("audio/opus"));
    assert_eq!(ctx.vendor.requests()[0].body["sample_rate"], json!(48000));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_empty_input(ctx: &TestContext) {
    for body in [json!({ "input": "" }), json!({ "input": "   " }), json!({})] {
        let response = ctx.client.post(SYNTHESIZE, &body).await.unwrap();
        response
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_error_message("Please provide valid text content");
    }

    assert_eq!(ctx.vendor.request_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_enforce_max_text_length(ctx: &TestContext) {
    let at_limit = "a".repeat(MAX_TEXT_LENGTH);
    let response = ctx
        .client
        .post(SYNTHESIZE, &json!({ "input": at_limit }))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);

    let over_limit = "a".repeat(MAX_TEXT_LENGTH + 1);
    let response = ctx
        .client
        .post(SYNTHESIZE, &json!({ "input": over_limit }))
        .await
        .unwrap();
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("maximum length");

    assert_eq!(ctx.vendor.request_count(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_json(ctx: &TestContext) {
    let response = ctx
        .client
        .post_raw(SYNTHESIZE, "{not json", "application/json")
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(!response.error_message().is_empty());
    assert_eq!(ctx.vendor.request_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_other_methods(ctx: &TestContext) {
    let response = ctx.client.get(SYNTHESIZE).await.unwrap();
    response
        .assert_status(StatusCode::METHOD_NOT_ALLOWED)
        .assert_error_message("Method not allowed");

    let response = ctx.client.put(SYNTHESIZE, &hello_request()).await.unwrap();
    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);

    let response = ctx.client.delete(SYNTHESIZE).await.unwrap();
    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);

    assert_eq!(ctx.vendor.request_count(), 0);
}

#[tokio::test]
async fn it_should_hide_configuration_details_when_key_missing() {
    let ctx = TestContext::with_options(TestOptions {
        api_key: None,
        ..Default::default()
    })
    .await
    .unwrap();

    let response = ctx.client.post(SYNTHESIZE, &hello_request()).await.unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("API configuration error, please contact the administrator");
    assert!(!response.error_message().contains("key"));
    assert_eq!(ctx.vendor.request_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_pass_vendor_error_through(ctx: &TestContext) {
    ctx.vendor.reply_with(VendorReply::Error {
        status: 400,
        body: r#"{"error":"Voice not found"}"#.to_string(),
    });

    let response = ctx.client.post(SYNTHESIZE, &hello_request()).await.unwrap();

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error_message(), "Voice not found");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_status_for_non_json_vendor_error(ctx: &TestContext) {
    ctx.vendor.reply_with(VendorReply::Error {
        status: 502,
        body: "<html>Bad Gateway</html>".to_string(),
    });

    let response = ctx.client.post(SYNTHESIZE, &hello_request()).await.unwrap();

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error_message(), "API request failed: 502");
    assert_eq!(ctx.vendor.request_count(), 1);
}

#[tokio::test]
async fn it_should_answer_with_mock_audio_in_development() {
    let ctx = TestContext::with_options(TestOptions {
        environment: Environment::Development,
        use_real_api: false,
        ..Default::default()
    })
    .await
    .unwrap();
    assert_eq!(ctx.mode(), SynthesisMode::Mock);

    let response = ctx
        .client
        .post(SYNTHESIZE, &json!({ "input": "Hello" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let data = &response.body.as_ref().unwrap()["data"];
    assert_eq!(data["audioUrl"], json!("/api/audio-mock"));
    assert!(data.get("audioContent").is_none());

    let duration = data["duration"].as_f64().unwrap();
    assert!((duration - 0.5).abs() < 1e-6, "unexpected duration {}", duration);
    assert_eq!(ctx.vendor.request_count(), 0);
}

#[tokio::test]
async fn it_should_call_vendor_in_development_when_real_api_requested() {
    let ctx = TestContext::with_options(TestOptions {
        environment: Environment::Development,
        use_real_api: true,
        ..Default::default()
    })
    .await
    .unwrap();

    let response = ctx.client.post(SYNTHESIZE, &hello_request()).await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.vendor.request_count(), 1);
}
