//! AgentLoop with a mocked provider

use async_trait::async_trait;
use esap_agent::tools::{ToolRegistry, ToolTrait};
use esap_agent::{AgentError, AgentLoop, Persona};
use esap_provider::{
    ChatRequest, ChatResponse, Provider, ProviderError, Role, ToolCall,
};
use mockall::{mock, Sequence};
use serde_json::{json, Value};

mock! {
    pub Provider {}

    #[async_trait]
    impl Provider for Provider {
        async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;
        fn default_model(&self) -> String;
        fn is_configured(&self) -> bool;
    }
}

/// Stands in for get_weather without any network
struct FakeWeather;

#[async_trait]
impl ToolTrait for FakeWeather {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "fake"
    }

    fn parameters(&self) -> Value {
        json!({"type": "object"})
    }

    async fn execute(
        &self,
        args: Value,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Ok(format!("sunny in {}", args["location"].as_str().unwrap_or("?")))
    }
}

fn weather_call(id: &str) -> ChatResponse {
    ChatResponse::tool_calls(vec![ToolCall {
        id: id.to_string(),
        name: "get_weather".to_string(),
        arguments: json!({"location": "Paris"}),
    }])
}

fn registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(FakeWeather);
    registry
}

#[tokio::test]
async fn test_tool_round_trip_then_answer() {
    let mut provider = MockProvider::new();
    let mut seq = Sequence::new();

    provider
        .expect_chat()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|req| {
            req.messages.len() == 2
                && req.messages[0].role == Role::System
                && req.tools.len() == 1
                && req.model == "test/model"
        })
        .returning(|_| Ok(weather_call("call_1")));
    provider
        .expect_chat()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|req| {
            let last = req.messages.last().unwrap();
            last.role == Role::Tool
                && last.tool_call_id.as_deref() == Some("call_1")
                && last.content.as_deref() == Some("sunny in Paris")
        })
        .returning(|_| Ok(ChatResponse::text("It is sunny in Paris.")));

    let agent = AgentLoop::new(provider, Persona::Weather, registry(), "test/model".to_string(), 5);
    let answer = agent.process("weather in Paris?").await.unwrap();

    assert_eq!(answer, "It is sunny in Paris.");
    let history = agent.history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[1].content.as_deref(), Some("It is sunny in Paris."));
}

#[tokio::test]
async fn test_unknown_tool_becomes_error_message() {
    let mut provider = MockProvider::new();
    let mut seq = Sequence::new();

    provider
        .expect_chat()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| {
            Ok(ChatResponse::tool_calls(vec![ToolCall {
                id: "c".to_string(),
                name: "launch_rocket".to_string(),
                arguments: json!({}),
            }]))
        });
    provider
        .expect_chat()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|req| {
            req.messages
                .last()
                .and_then(|m| m.content.as_deref())
                .map(|c| c.starts_with("Error:"))
                .unwrap_or(false)
        })
        .returning(|_| Ok(ChatResponse::text("I can't do that.")));

    let agent = AgentLoop::new(provider, Persona::Weather, registry(), String::new(), 5);
    assert_eq!(agent.process("launch").await.unwrap(), "I can't do that.");
}

#[tokio::test]
async fn test_max_iterations() {
    let mut provider = MockProvider::new();
    provider
        .expect_chat()
        .times(3)
        .returning(|_| Ok(weather_call("loop")));

    let agent = AgentLoop::new(provider, Persona::Weather, registry(), String::new(), 3);
    let err = agent.process("forever").await.unwrap_err();

    assert!(matches!(err, AgentError::MaxIterations));
    assert!(agent.history().await.is_empty());
}

#[tokio::test]
async fn test_provider_error_surfaces() {
    let mut provider = MockProvider::new();
    provider
        .expect_chat()
        .returning(|_| Err(ProviderError::NoApiKey));

    let agent = AgentLoop::new(provider, Persona::Hrms, ToolRegistry::new(), String::new(), 3);
    let err = agent.process("hi").await.unwrap_err();
    assert!(matches!(err, AgentError::Provider(_)));
}

#[tokio::test]
async fn test_history_is_replayed_and_trimmed() {
    let mut provider = MockProvider::new();
    let mut seq = Sequence::new();
    provider
        .expect_chat()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(ChatResponse::text("one")));
    provider
        .expect_chat()
        .times(1)
        .in_sequence(&mut seq)
        // system + two remembered turns + new user message
        .withf(|req| req.messages.len() == 4 && req.messages[2].content.as_deref() == Some("one"))
        .returning(|_| Ok(ChatResponse::text("two")));

    let mut agent = AgentLoop::new(provider, Persona::Scm, ToolRegistry::new(), String::new(), 3);
    agent.set_max_history(2);

    agent.process("first").await.unwrap();
    agent.process("second").await.unwrap();

    let history = agent.history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].content.as_deref(), Some("second"));

    agent.clear_history().await;
    assert!(agent.history().await.is_empty());
}

#[tokio::test]
async fn test_odd_history_limit_keeps_whole_turns() {
    let mut provider = MockProvider::new();
    let mut seq = Sequence::new();
    for answer in ["one", "two"] {
        provider
            .expect_chat()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(ChatResponse::text(answer)));
    }
    provider
        .expect_chat()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|req| req.messages.len() == 4 && req.messages[1].role == Role::User)
        .returning(|_| Ok(ChatResponse::text("three")));

    let mut agent = AgentLoop::new(provider, Persona::Scm, ToolRegistry::new(), String::new(), 3);
    agent.set_max_history(3);

    agent.process("first").await.unwrap();
    agent.process("second").await.unwrap();
    let history = agent.history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].content.as_deref(), Some("second"));

    agent.process("third").await.unwrap();
    assert_eq!(agent.history().await[0].role, Role::User);
}
