/*!
 * Tests for LLM provider implementations
 */

#![allow(non_snake_case)]

use std::sync::Arc;

use readscan::errors::{ProviderError, TransformError};
use readscan::providers::anthropic::AnthropicRequest;
use readscan::providers::mock::MockProvider;
use readscan::providers::{LlmProvider, Message};
use readscan::transformation::LlmCleanup;
use readscan::Transformation;

#[test]
fn test_anthropic_request_withSystemMessages_shouldMoveThemToSystemField() {
    let request = AnthropicRequest::from_messages(
        "claude-haiku-4-5",
        64000,
        &[
            Message::system("Fix OCR mistakes."),
            Message::system("Answer in Polish."),
            Message::user("tekst"),
        ],
    );
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["system"], "Fix OCR mistakes.\n\nAnswer in Polish.");
    assert_eq!(json["max_tokens"], 64000);
    assert_eq!(json["messages"].as_array().unwrap().len(), 1);
    assert_eq!(json["messages"][0]["role"], "user");
}

#[tokio::test]
async fn test_mock_provider_withCustomResponse_shouldTransformUserText() {
    let provider = MockProvider::working().with_custom_response(|text| text.to_uppercase());
    let answer = provider
        .clean(&[Message::system("prompt"), Message::user("za każdym razem")])
        .await
        .unwrap();
    assert_eq!(answer, "ZA KAŻDYM RAZEM");
}

#[tokio::test]
async fn test_mock_provider_clones_shouldShareRequestCount() {
    let provider = MockProvider::slow(5);
    let clone = provider.clone();
    clone.clean(&[Message::user("a")]).await.unwrap();
    provider.clean(&[Message::user("b")]).await.unwrap();
    assert_eq!(provider.request_count(), 2);
}

#[tokio::test]
async fn test_llm_cleanup_withEmptyProviderAnswer_shouldReturnEmpty() {
    let stage = LlmCleanup::new(Arc::new(MockProvider::empty()), "Clean the text");
    assert_eq!(stage.transform("83\nstrona").await.unwrap(), "");
}

#[tokio::test]
async fn test_llm_cleanup_withFailingProvider_shouldPropagateApiError() {
    let stage = LlmCleanup::with_default_prompt(Arc::new(MockProvider::failing()));
    match stage.transform("tekst").await {
        Err(TransformError::Provider(ProviderError::ApiError { status_code, .. })) => {
            assert_eq!(status_code, 500)
        }
        other => panic!("unexpected result {:?}", other),
    }
}
