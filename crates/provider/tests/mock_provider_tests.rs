//! The Provider trait can be mocked by consumers

use async_trait::async_trait;
use esap_provider::{ChatRequest, ChatResponse, Message, Provider, ProviderError, ToolCall};
use mockall::mock;
use serde_json::json;

mock! {
    pub Provider {}

    #[async_trait]
    impl Provider for Provider {
        async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;
        fn default_model(&self) -> String;
        fn is_configured(&self) -> bool;
    }
}

#[tokio::test]
async fn test_mock_provider_returns_tool_calls() {
    let mut mock = MockProvider::new();
    mock.expect_chat()
        .times(1)
        .withf(|req| req.messages.len() == 1 && req.messages[0].content.as_deref() == Some("who is 7?"))
        .returning(|_| {
            Ok(ChatResponse::tool_calls(vec![ToolCall {
                id: "call_1".to_string(),
                name: "get_employee_by_id".to_string(),
                arguments: json!({"id": 7}),
            }]))
        });

    let response = mock
        .chat(ChatRequest {
            messages: vec![Message::user("who is 7?")],
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(response.has_tool_calls());
    assert_eq!(response.tool_calls[0].arguments["id"], 7);
}

#[tokio::test]
async fn test_mock_provider_error_passthrough() {
    let mut mock = MockProvider::new();
    mock.expect_chat()
        .returning(|_| Err(ProviderError::RateLimited));

    let result = mock.chat(ChatRequest::default()).await;
    assert!(matches!(result, Err(ProviderError::RateLimited)));
}

#[test]
fn test_mock_provider_metadata() {
    let mut mock = MockProvider::new();
    mock.expect_default_model()
        .returning(|| "mock/model".to_string());
    mock.expect_is_configured().returning(|| false);

    assert_eq!(mock.default_model(), "mock/model");
    assert!(!mock.is_configured());
}
