//! Mock LLM Provider for Testing
//!
//! A configurable mock provider that simulates model behavior for
//! integration tests: queued responses, scripted tool calls, and request
//! recording for verification.
//!
//! # Example
//!
//! ```rust,ignore
//! use deskhand_providers::mock::{MockProvider, MockResponse};
//!
//! // Simple text-only response
//! let provider = MockProvider::new()
//!     .with_response(MockResponse::text("Hello, world!"));
//!
//! // Response with a tool call
//! let provider = MockProvider::new()
//!     .with_response(MockResponse::tool_call("search_contacts", json!({"query": "Brandon"})));
//! ```

use crate::{
    CompletionRequest, CompletionResponse, LlmProvider, ToolCall, Usage,
};
use anyhow::Result;
use std::sync::{Arc, Mutex};

/// A mock response that can be configured for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
    pub usage: Usage,
}

impl MockResponse {
    /// Create a simple text-only response
    pub fn text(content: &str) -> Self {
        Self {
            content: Some(content.to_string()),
            tool_calls: Vec::new(),
            usage: Usage {
                prompt_tokens: 100,
                completion_tokens: content.len() as u32 / 4,
                total_tokens: 100 + content.len() as u32 / 4,
            },
        }
    }

    /// Create a response requesting a single tool call
    pub fn tool_call(name: &str, arguments: serde_json::Value) -> Self {
        Self {
            content: None,
            tool_calls: vec![ToolCall::new(name, arguments)],
            usage: Usage {
                prompt_tokens: 100,
                completion_tokens: 50,
                total_tokens: 150,
            },
        }
    }

    /// Create a response with text alongside a tool call
    pub fn text_then_tool_call(text: &str, name: &str, arguments: serde_json::Value) -> Self {
        Self {
            content: Some(text.to_string()),
            tool_calls: vec![ToolCall::new(name, arguments)],
            usage: Usage {
                prompt_tokens: 100,
                completion_tokens: 50 + text.len() as u32 / 4,
                total_tokens: 150 + text.len() as u32 / 4,
            },
        }
    }

    /// Create a response with neither text nor tool calls. Exercises the
    /// empty-answer fallback path in the orchestrator.
    pub fn empty() -> Self {
        Self {
            content: None,
            tool_calls: Vec::new(),
            usage: Usage::default(),
        }
    }

    /// Builder: set custom usage
    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }
}

/// A mock LLM provider for testing
///
/// The provider maintains a queue of responses that are returned in order.
/// It also tracks all requests made for verification in tests.
pub struct MockProvider {
    name: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    /// Queue of responses to return (FIFO)
    responses: Arc<Mutex<Vec<MockResponse>>>,
    /// All requests received (for verification)
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    /// Default response when queue is empty
    default_response: Option<MockResponse>,
}

impl MockProvider {
    /// Create a new mock provider with default settings
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            model: "mock-model".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            default_response: None,
        }
    }

    /// Set the provider name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Add a response to the queue
    pub fn with_response(self, response: MockResponse) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    /// Add multiple responses to the queue
    pub fn with_responses(self, responses: Vec<MockResponse>) -> Self {
        self.responses.lock().unwrap().extend(responses);
        self
    }

    /// Set a default response when queue is empty
    pub fn with_default_response(mut self, response: MockResponse) -> Self {
        self.default_response = Some(response);
        self
    }

    /// Get all requests that were made to this provider
    pub fn get_requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Get the number of requests made
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Clear recorded requests
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    /// Get the next response from the queue (or default)
    fn next_response(&self) -> MockResponse {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            self.default_response
                .clone()
                .unwrap_or_else(|| MockResponse::text("Mock response (no responses configured)"))
        } else {
            responses.remove(0)
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmProvider for MockProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        // Record the request
        self.requests.lock().unwrap().push(request);

        let response = self.next_response();

        Ok(CompletionResponse {
            content: response.content,
            tool_calls: response.tool_calls,
            usage: response.usage,
            model: self.model.clone(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    fn temperature(&self) -> f32 {
        self.temperature
    }
}

// ============================================================================
// Preset Scenarios for Common Test Cases
// ============================================================================

/// Preset scenarios for common testing patterns
pub mod scenarios {
    use super::*;

    /// A provider that returns a simple text response
    pub fn text_only_response(text: &str) -> MockProvider {
        MockProvider::new().with_response(MockResponse::text(text))
    }

    /// A provider that simulates tool execution flow:
    /// 1. First call: returns a tool call
    /// 2. Second call: returns text after the tool result
    pub fn tool_then_response(
        name: &str,
        arguments: serde_json::Value,
        final_response: &str,
    ) -> MockProvider {
        MockProvider::new().with_responses(vec![
            MockResponse::tool_call(name, arguments),
            MockResponse::text(final_response),
        ])
    }

    /// A provider that requests the given tool on every call, forever.
    /// Exercises the orchestrator's round budget.
    pub fn always_calls_tool(name: &str, arguments: serde_json::Value) -> MockProvider {
        MockProvider::new()
            .with_default_response(MockResponse::tool_call(name, arguments))
    }
}
