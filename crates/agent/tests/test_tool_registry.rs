//! Tests for tool registry

use async_trait::async_trait;
use esap_agent::tools::{to_provider_tool, ToolRegistry, ToolTrait};
use esap_agent::{AgentError, Backends};
use esap_config::Config;
use serde_json::{json, Value};

struct EchoTool(&'static str);

#[async_trait]
impl ToolTrait for EchoTool {
    fn name(&self) -> &str {
        self.0
    }

    fn description(&self) -> &str {
        "Echo the arguments back"
    }

    fn parameters(&self) -> Value {
        json!({"type": "object", "properties": {"text": {"type": "string"}}})
    }

    async fn execute(
        &self,
        args: Value,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        match args.get("text").and_then(Value::as_str) {
            Some(text) => Ok(text.to_string()),
            None => Err("text is required".into()),
        }
    }
}

#[test]
fn test_registry_new() {
    let registry = ToolRegistry::new();
    assert!(registry.names().is_empty());
    assert!(registry.is_empty());
}

#[test]
fn test_registry_default() {
    let registry: ToolRegistry = Default::default();
    assert_eq!(registry.len(), 0);
}

#[test]
fn test_registry_register_and_get() {
    let mut registry = ToolRegistry::new();
    registry.register(EchoTool("echo"));

    assert!(registry.has("echo"));
    assert!(!registry.has("nonexistent"));
    assert_eq!(registry.get("echo").unwrap().name(), "echo");
    assert!(registry.get("nonexistent").is_none());
}

#[test]
fn test_registry_replaces_same_name() {
    let mut registry = ToolRegistry::new();
    registry.register(EchoTool("echo"));
    registry.register(EchoTool("echo"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_definitions_sorted_by_name() {
    let mut registry = ToolRegistry::new();
    registry.register(EchoTool("zulu"));
    registry.register(EchoTool("alpha"));
    registry.register(EchoTool("mike"));

    let names: Vec<String> = registry
        .definitions()
        .into_iter()
        .map(|d| d.function.name)
        .collect();
    assert_eq!(names, vec!["alpha", "mike", "zulu"]);
    assert_eq!(registry.names(), vec!["alpha", "mike", "zulu"]);
}

#[test]
fn test_to_provider_tool() {
    let spec = to_provider_tool(&EchoTool("echo"));
    assert_eq!(spec.tool_type, "function");
    assert_eq!(spec.function.description, "Echo the arguments back");
    assert_eq!(spec.function.parameters["properties"]["text"]["type"], "string");
}

#[tokio::test]
async fn test_execute_and_call() {
    let mut registry = ToolRegistry::new();
    registry.register(EchoTool("echo"));

    assert_eq!(registry.execute("echo", json!({"text": "hi"})).await.unwrap(), "hi");
    assert!(registry.execute("missing", json!({})).await.is_err());

    let err = registry.call("missing", json!({})).await.unwrap_err();
    assert!(matches!(err, AgentError::ToolNotFound(ref n) if n == "missing"));

    let err = registry.call("echo", json!({})).await.unwrap_err();
    assert!(matches!(err, AgentError::ToolExecution(ref m) if m == "text is required"));
}

#[test]
fn test_backends_expose_full_catalogue() {
    let backends = Backends::from_config(&Config::default()).unwrap();
    let registry = backends.full_registry();

    assert_eq!(registry.len(), 18);
    for name in [
        "get_all_employees",
        "multi_delete_products",
        "update_supplier",
        "post_carrier",
        "get_weather",
    ] {
        assert!(registry.has(name), "missing {name}");
    }
}

#[test]
fn test_registry_for_subset() {
    let backends = Backends::from_config(&Config::default()).unwrap();
    let registry = backends.registry_for(&["get_weather", "post_carrier", "not_a_tool"]);
    assert_eq!(registry.names(), vec!["get_weather", "post_carrier"]);
}
