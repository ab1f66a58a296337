//! Agent loop - tool-calling conversation with one persona

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use esap_config::AgentDefaults;
use esap_provider::{ChatRequest, Message, Provider, ToolChoice};

use crate::persona::Persona;
use crate::tools::ToolRegistry;
use crate::{AgentError, Result};

/// Conversation turns kept between calls (user and assistant text only)
const DEFAULT_MAX_HISTORY: usize = 20;

pub struct AgentLoop<P: Provider> {
    provider: Arc<P>,
    persona: Persona,
    tools: ToolRegistry,
    model: String,
    max_iterations: u32,
    max_tokens: u32,
    temperature: f32,
    max_history: usize,
    history: Mutex<Vec<Message>>,
}

impl<P: Provider> AgentLoop<P> {
    pub fn new(
        provider: P,
        persona: Persona,
        tools: ToolRegistry,
        model: String,
        max_iterations: u32,
    ) -> Self {
        let defaults = AgentDefaults::default();
        Self {
            provider: Arc::new(provider),
            persona,
            tools,
            model,
            max_iterations,
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
            max_history: DEFAULT_MAX_HISTORY,
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn with_defaults(
        provider: P,
        persona: Persona,
        tools: ToolRegistry,
        defaults: &AgentDefaults,
    ) -> Self {
        let mut agent = Self::new(
            provider,
            persona,
            tools,
            defaults.model.clone(),
            defaults.max_tool_iterations,
        );
        agent.max_tokens = defaults.max_tokens;
        agent.temperature = defaults.temperature;
        agent
    }

    pub fn set_max_history(&mut self, max: usize) {
        self.max_history = max;
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub async fn history(&self) -> Vec<Message> {
        self.history.lock().await.clone()
    }

    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
    }

    /// Answer one user message, calling tools as the model requests
    pub async fn process(&self, input: &str) -> Result<String> {
        info!("{} processing message", self.persona.display_name());
        debug!("Content: {}", input.chars().take(100).collect::<String>());

        let mut history = self.history.lock().await;

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(self.persona.instructions()));
        messages.extend(history.iter().cloned());
        messages.push(Message::user(input));

        let answer = self.run(messages).await?;

        history.push(Message::user(input));
        history.push(Message::assistant(answer.clone()));
        if history.len() > self.max_history {
            // whole user/assistant pairs, so replay never opens on an answer
            let excess = (history.len() - self.max_history).div_ceil(2) * 2;
            let len = history.len();
            history.drain(..excess.min(len));
        }

        Ok(answer)
    }

    async fn run(&self, mut messages: Vec<Message>) -> Result<String> {
        let definitions = self.tools.definitions();
        let mut iteration = 0;

        loop {
            iteration += 1;
            if iteration > self.max_iterations {
                warn!("{} hit {} iterations", self.persona.display_name(), self.max_iterations);
                return Err(AgentError::MaxIterations);
            }
            debug!("Agent iteration {}", iteration);

            let request = ChatRequest {
                model: self.model.clone(),
                messages: messages.clone(),
                tools: definitions.clone(),
                max_tokens: self.max_tokens,
                temperature: self.temperature,
                tool_choice: ToolChoice::Auto,
            };

            let response = self
                .provider
                .chat(request)
                .await
                .map_err(|e| AgentError::Provider(e.to_string()))?;

            if !response.has_tool_calls() {
                return Ok(response
                    .content
                    .unwrap_or_else(|| "Task completed.".to_string()));
            }

            messages.push(Message::assistant_tool_calls(
                response.content.clone(),
                &response.tool_calls,
            ));

            for call in &response.tool_calls {
                debug!("Executing tool: {}", call.name);
                let result = self
                    .tools
                    .execute(&call.name, call.arguments.clone())
                    .await
                    .unwrap_or_else(|e| format!("Error: {}", e));
                messages.push(Message::tool(&call.id, &call.name, result));
            }
        }
    }
}
