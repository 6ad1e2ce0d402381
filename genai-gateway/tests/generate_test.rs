//! Integration tests for the generation endpoints, run against the mock provider.

mod common;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::{file_part, TestApp};
use genai_gateway::config::GatewayConfig;
use genai_gateway::models::ContentPart;
use genai_gateway::services::providers::mock::MockProvider;
use reqwest::{multipart, StatusCode};
use serde_json::{json, Value};

const UPLOAD_ENDPOINTS: [(&str, &str, &str); 3] = [
    ("/generate-from-image", "image", "Image file is required."),
    (
        "/generate-from-document",
        "document",
        "Document file is required.",
    ),
    ("/generate-from-audio", "audio", "Audio file is required."),
];

#[tokio::test]
async fn generate_text_returns_generated_text() {
    let app = TestApp::spawn(MockProvider::with_text("Once upon a time")).await;

    let response = app
        .client
        .post(app.url("/generate-text"))
        .json(&json!({ "prompt": "Tell me a story" }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "generatedText": "Once upon a time" }));

    let requests = app.provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].parts(), &[ContentPart::text("Tell me a story")]);
}

#[tokio::test]
async fn generate_text_without_prompt_is_rejected() {
    let app = TestApp::spawn(MockProvider::with_text("unused")).await;

    for body in [json!({}), json!({ "prompt": "" }), json!({ "prompt": 3 })] {
        let response = app
            .client
            .post(app.url("/generate-text"))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Prompt is required." }));
    }

    assert!(app.provider.requests().is_empty());
}

#[tokio::test]
async fn generate_text_with_malformed_json_is_rejected() {
    let app = TestApp::spawn(MockProvider::with_text("unused")).await;

    let response = app
        .client
        .post(app.url("/generate-text"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Prompt is required.");
}

#[tokio::test]
async fn image_upload_forwards_prompt_then_inline_data() {
    let app = TestApp::spawn(MockProvider::with_text("A red square")).await;
    let image = vec![0x89, b'P', b'N', b'G', 1, 2, 3];

    let form = multipart::Form::new()
        .text("prompt", "Describe the image")
        .part("image", file_part(image.clone(), "square.png", "image/png"));

    let response = app
        .client
        .post(app.url("/generate-from-image"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["generatedText"], "A red square");

    let requests = app.provider.requests();
    assert_eq!(requests.len(), 1);
    let parts = requests[0].parts();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0], ContentPart::text("Describe the image"));
    match &parts[1] {
        ContentPart::InlineData { inline_data } => {
            assert_eq!(inline_data.mime_type, "image/png");
            assert_eq!(STANDARD.decode(&inline_data.data).unwrap(), image);
        }
        other => panic!("expected inline data, got {:?}", other),
    }
}

#[tokio::test]
async fn upload_without_prompt_sends_only_the_file() {
    let app = TestApp::spawn(MockProvider::with_text("Transcript")).await;

    let form = multipart::Form::new().part(
        "audio",
        file_part(vec![7; 64], "clip.mp3", "audio/mpeg"),
    );

    let response = app
        .client
        .post(app.url("/generate-from-audio"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::OK);

    let requests = app.provider.requests();
    assert_eq!(requests[0].parts().len(), 1);
    assert!(requests[0].parts()[0].is_inline_data());
    assert_eq!(requests[0].inline_mime_type(), Some("audio/mpeg"));
}

#[tokio::test]
async fn document_upload_accepts_any_mime_type() {
    let app = TestApp::spawn(MockProvider::with_text("Summary")).await;

    let form = multipart::Form::new()
        .text("prompt", "Summarize")
        .part(
            "document",
            file_part(b"plain notes".to_vec(), "notes.xyz", "application/x-unknown"),
        );

    let response = app
        .client
        .post(app.url("/generate-from-document"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        app.provider.requests()[0].inline_mime_type(),
        Some("application/x-unknown")
    );
}

#[tokio::test]
async fn upload_endpoints_require_their_file() {
    let app = TestApp::spawn(MockProvider::with_text("unused")).await;

    for (path, _, message) in UPLOAD_ENDPOINTS {
        let form = multipart::Form::new().text("prompt", "anything");

        let response = app
            .client
            .post(app.url(path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request.");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", path);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "error": message }));
    }

    assert!(app.provider.requests().is_empty());
}

#[tokio::test]
async fn image_endpoint_without_multipart_body_requires_file() {
    let app = TestApp::spawn(MockProvider::with_text("unused")).await;

    let response = app
        .client
        .post(app.url("/generate-from-image"))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Image file is required." }));
}

#[tokio::test]
async fn file_under_wrong_field_is_rejected() {
    let app = TestApp::spawn(MockProvider::with_text("unused")).await;

    let form = multipart::Form::new().part(
        "document",
        file_part(vec![1, 2, 3], "a.pdf", "application/pdf"),
    );

    let response = app
        .client
        .post(app.url("/generate-from-image"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Unexpected file field: document");
}

#[tokio::test]
async fn second_file_is_rejected() {
    let app = TestApp::spawn(MockProvider::with_text("unused")).await;

    let form = multipart::Form::new()
        .part("image", file_part(vec![1], "a.png", "image/png"))
        .part("image", file_part(vec![2], "b.png", "image/png"));

    let response = app
        .client
        .post(app.url("/generate-from-image"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.provider.requests().is_empty());
}

#[tokio::test]
async fn upstream_failure_is_relayed_as_500() {
    let app = TestApp::spawn(MockProvider::failing("quota exceeded")).await;
    let expected = json!({ "error": "quota exceeded" });

    let response = app
        .client
        .post(app.url("/generate-text"))
        .json(&json!({ "prompt": "hi" }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>().await.unwrap(), expected);

    for (path, field, _) in UPLOAD_ENDPOINTS {
        let form = multipart::Form::new().part(
            field,
            file_part(vec![0; 16], "upload.bin", "application/octet-stream"),
        );

        let response = app
            .client
            .post(app.url(path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request.");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{}", path);
        assert_eq!(response.json::<Value>().await.unwrap(), expected);
    }
}

#[tokio::test]
async fn response_without_text_returns_raw_json() {
    let raw = json!({ "candidates": [], "promptFeedback": {} });
    let app = TestApp::spawn(MockProvider::responding(raw.clone())).await;

    let response = app
        .client
        .post(app.url("/generate-text"))
        .json(&json!({ "prompt": "hi" }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["generatedText"],
        serde_json::to_string_pretty(&raw).unwrap()
    );
}

#[tokio::test]
async fn malformed_response_returns_parse_failure_text() {
    let app = TestApp::spawn(MockProvider::responding(json!({ "candidates": 5 }))).await;

    let response = app
        .client
        .post(app.url("/generate-text"))
        .json(&json!({ "prompt": "hi" }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["generatedText"], "Failed to parse AI response.");
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let mut config = GatewayConfig::for_port(0);
    config.limits.max_upload_bytes = 1024;
    let app = TestApp::spawn_with_config(MockProvider::with_text("unused"), config).await;

    let form = multipart::Form::new().part(
        "image",
        file_part(vec![0; 8 * 1024], "big.png", "image/png"),
    );

    let response = app
        .client
        .post(app.url("/generate-from-image"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.provider.requests().is_empty());
}

#[tokio::test]
async fn oversized_text_body_is_rejected() {
    let mut config = GatewayConfig::for_port(0);
    config.limits.max_upload_bytes = 1024;
    let app = TestApp::spawn_with_config(MockProvider::with_text("unused"), config).await;

    let response = app
        .client
        .post(app.url("/generate-text"))
        .json(&json!({ "prompt": "x".repeat(8 * 1024) }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.provider.requests().is_empty());
}
