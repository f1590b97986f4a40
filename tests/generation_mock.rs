//! Generation calls against a mock provider.

mod common;

use clinic_genai::catalog::{ApiVersion, GenerationMethod};
use clinic_genai::transport::HttpTransport;
use clinic_genai::types::{Part, Turn};
use clinic_genai::{Error, GenerationOptions, GenerativeModel, ResolvedEndpoint, ResolverConfig};
use common::{catalog, content_reply, MockServerFixture};
use mockito::Matcher;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn generate_content_round_trip() {
    let mut fixture = MockServerFixture::new().await;
    fixture.standard_catalog().await;
    let call = fixture
        .mock_generate(
            "v1beta",
            "gemini-2.5-flash:generateContent",
            Matcher::PartialJson(json!({
                "contents": [{"role": "user", "parts": [{"text": "Summarize: BP 150/95"}]}],
                "generationConfig": {"maxOutputTokens": 256}
            })),
            200,
            content_reply("Stage 2 hypertension."),
        )
        .await;

    let genai = fixture.genai();
    let model = genai
        .model(GenerationOptions::new().with_max_output_tokens(256))
        .await
        .unwrap();
    let text = model.generate("Summarize: BP 150/95").await.unwrap();

    assert_eq!(text, "Stage 2 hypertension.");
    call.assert_async().await;
}

#[tokio::test]
async fn api_key_option_goes_to_query_not_body() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .catalog_mock(
            "v1beta",
            Matcher::Any,
            200,
            catalog(&[("models/gemini-2.5-flash", &["generateContent"])]),
        )
        .create_async()
        .await;
    fixture
        .catalog_mock("v1", Matcher::Any, 200, json!({"models": []}))
        .create_async()
        .await;

    let call = fixture
        .server
        .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
        .match_query(Matcher::UrlEncoded("key".into(), "caller-key".into()))
        .match_body(Matcher::Json(json!({
            "contents": [{"role": "user", "parts": [{"text": "hi"}]}],
            "generationConfig": {"temperature": 0.5}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(content_reply("hello").to_string())
        .expect(1)
        .create_async()
        .await;

    let genai = fixture.genai();
    let options = GenerationOptions::new()
        .with_temperature(0.5)
        .with_api_key("caller-key");
    let text = genai.model(options).await.unwrap().generate("hi").await.unwrap();

    assert_eq!(text, "hello");
    call.assert_async().await;
}

#[tokio::test]
async fn generate_message_endpoint() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .mock_catalog(
            "v1beta",
            200,
            catalog(&[("models/text-bison-001", &["generateMessage"])]),
        )
        .await;
    fixture.mock_catalog("v1", 200, json!({"models": []})).await;
    let call = fixture
        .mock_generate(
            "v1beta",
            "text-bison-001:generateMessage",
            Matcher::PartialJson(json!({
                "prompt": {"messages": [{"author": "0", "content": "ping"}]},
                "candidateCount": 1
            })),
            200,
            json!({"candidates": [{"author": "1", "content": "pong"}]}),
        )
        .await;

    let genai = fixture.genai();
    let model = genai.model(GenerationOptions::new()).await.unwrap();
    assert_eq!(model.endpoint().to_string(), "v1beta/models/text-bison-001:generateMessage");
    assert_eq!(model.generate("ping").await.unwrap(), "pong");
    call.assert_async().await;
}

#[tokio::test]
async fn conversation_keeps_history_only_for_successful_turns() {
    let mut fixture = MockServerFixture::new().await;
    fixture.standard_catalog().await;
    fixture
        .mock_generate(
            "v1beta",
            "gemini-2.5-flash:generateContent",
            Matcher::Json(json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "Report: TSH 0.01"}]},
                    {"role": "model", "parts": [{"text": "Understood."}]},
                    {"role": "user", "parts": [{"text": "Is this hyperthyroidism?"}]}
                ]
            })),
            200,
            content_reply("Likely, pending free T4."),
        )
        .await;
    fixture
        .mock_generate(
            "v1beta",
            "gemini-2.5-flash:generateContent",
            Matcher::Regex("trigger failure".into()),
            500,
            json!({"error": {"code": 500, "message": "internal"}}),
        )
        .await;

    let genai = fixture.genai();
    let model = genai.model(GenerationOptions::new()).await.unwrap();
    let mut conversation = model.start_conversation(vec![
        Turn::user("Report: TSH 0.01"),
        Turn::model("Understood."),
    ]);

    let reply = conversation.send("Is this hyperthyroidism?").await.unwrap();
    assert_eq!(reply, "Likely, pending free T4.");
    assert_eq!(conversation.history().len(), 4);

    let err = conversation.send("trigger failure").await.unwrap_err();
    assert!(matches!(err, Error::GenerationFailed { status: Some(500), .. }));
    assert_eq!(conversation.history().len(), 4);
}

#[tokio::test]
async fn rate_limit_surfaces_status() {
    let mut fixture = MockServerFixture::new().await;
    fixture.standard_catalog().await;
    fixture
        .mock_generate(
            "v1beta",
            "gemini-2.5-flash:generateContent",
            Matcher::Any,
            429,
            json!({"error": {"code": 429, "message": "Resource has been exhausted"}}),
        )
        .await;

    let genai = fixture.genai();
    let model = genai.model(GenerationOptions::new()).await.unwrap();
    match model.generate("hello").await.unwrap_err() {
        Error::GenerationFailed { reason, status } => {
            assert_eq!(status, Some(429));
            assert!(reason.contains("Resource has been exhausted"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn multi_part_prompt_sends_inline_data() {
    let mut fixture = MockServerFixture::new().await;
    fixture.standard_catalog().await;
    let call = fixture
        .mock_generate(
            "v1beta",
            "gemini-2.5-flash:generateContent",
            Matcher::Json(json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        {"text": "Transcribe and summarize."},
                        {"inlineData": {"mimeType": "audio/webm", "data": "AAEC"}}
                    ]
                }]
            })),
            200,
            content_reply("S: ... O: ... A: ... P: ..."),
        )
        .await;

    let genai = fixture.genai();
    let model = genai.model(GenerationOptions::new()).await.unwrap();
    let parts = vec![
        Part::text("Transcribe and summarize."),
        Part::inline_bytes("audio/webm", [0u8, 1, 2]),
    ];
    assert!(model.generate(parts).await.unwrap().starts_with("S:"));
    call.assert_async().await;
}

#[tokio::test]
async fn blocked_prompt_is_a_generation_failure() {
    let mut fixture = MockServerFixture::new().await;
    fixture.standard_catalog().await;
    fixture
        .mock_generate(
            "v1beta",
            "gemini-2.5-flash:generateContent",
            Matcher::Any,
            200,
            json!({"promptFeedback": {"blockReason": "SAFETY"}}),
        )
        .await;

    let genai = fixture.genai();
    let model = genai.model(GenerationOptions::new()).await.unwrap();
    let err = model.generate("hello").await.unwrap_err();
    assert!(err.to_string().contains("prompt blocked: SAFETY"));
}

#[tokio::test]
async fn unreachable_provider_error_omits_credential() {
    let config = ResolverConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        ..ResolverConfig::default()
    };
    let model = GenerativeModel::new(
        Arc::new(HttpTransport::new(&config).unwrap()),
        ResolvedEndpoint::new("gemini", GenerationMethod::GenerateContent, ApiVersion::V1),
        "AIzaSECRET123",
        GenerationOptions::new(),
    );

    let err = model.generate("hello").await.unwrap_err();
    assert!(matches!(err, Error::GenerationFailed { status: None, .. }));
    let text = err.to_string();
    assert!(!text.contains("AIzaSECRET123"), "{text}");
    assert!(!text.contains("key="), "{text}");
}
