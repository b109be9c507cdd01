//! The state machine for a single chat turn: model call, tool execution,
//! repeat under a hard round budget, then a forced tool-free final call.

use anyhow::Result;
use deskhand_providers::{CompletionRequest, LlmProvider, Message, Tool, ToolChoice};
use std::sync::Arc;

use crate::executor::{Executor, ToolOutcome};
use crate::observer::TurnObserver;
use crate::prompts;
use crate::tool_args::ToolRequest;
use crate::tool_definitions::assistant_tools;

/// Returned when the model produces no usable text after its tools ran.
const COMPLETED_FALLBACK: &str = "I've completed the requested action.";

/// One prior turn supplied by the caller. Only `user` and `assistant`
/// roles with non-placeholder content are replayed into the prompt.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct IncomingTurn {
    pub role: String,
    pub content: String,
}

impl IncomingTurn {
    /// Front-ends append transient "typing" placeholders to the history
    /// they send back; those must not reach the model.
    fn is_replayable(&self) -> bool {
        let content = self.content.trim();
        if content.is_empty() || content == "..." {
            return false;
        }
        matches!(self.role.as_str(), "user" | "assistant")
    }
}

pub struct Orchestrator {
    provider: Arc<dyn LlmProvider>,
    executor: Executor,
    observer: Arc<dyn TurnObserver>,
    max_tool_rounds: u32,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        executor: Executor,
        observer: Arc<dyn TurnObserver>,
        max_tool_rounds: u32,
    ) -> Self {
        Self {
            provider,
            executor,
            observer,
            max_tool_rounds,
        }
    }

    /// Run one turn to completion and return the user-visible answer.
    ///
    /// Tool calls within the turn are strictly sequential: each result is
    /// appended to the message list before the model decides its next
    /// action, because later calls depend on identifiers returned by
    /// earlier ones. Tools already executed are never retried.
    pub async fn run_turn(&self, user_message: &str, history: &[IncomingTurn]) -> Result<String> {
        let mut messages = self.build_messages(user_message, history);
        let tools = assistant_tools();

        self.observer.on_model_call(0);
        let mut response = self
            .provider
            .complete(self.tool_request(messages.clone(), &tools))
            .await?;

        // Round 0: model answered directly, no tool context to settle.
        if response.is_final() {
            if let Some(text) = nonempty(&response.content) {
                self.observer.on_answer(&text);
                return Ok(text);
            }
        }

        let mut rounds = 0;
        while !response.tool_calls.is_empty() && rounds < self.max_tool_rounds {
            rounds += 1;
            messages.push(Message::assistant_tool_calls(
                response.content.clone(),
                response.tool_calls.clone(),
            ));

            for call in &response.tool_calls {
                self.observer.on_tool_requested(call);
                let outcome = match ToolRequest::parse(&call.name, &call.arguments) {
                    Ok(request) => self.executor.execute(&request).await,
                    Err(e) => ToolOutcome::from_parse_error(e),
                };
                self.observer.on_tool_completed(call, &outcome);
                messages.push(Message::tool_result(call, outcome.to_json_string()));
            }

            // Budget spent: skip straight to the forced tool-free call
            // rather than letting the model queue another round.
            if rounds >= self.max_tool_rounds {
                self.observer.on_round_budget_exhausted(self.max_tool_rounds);
                break;
            }

            self.observer.on_model_call(rounds);
            response = self
                .provider
                .complete(self.tool_request(messages.clone(), &tools))
                .await?;
        }

        if response.tool_calls.is_empty() {
            if let Some(text) = nonempty(&response.content) {
                self.observer.on_answer(&text);
                return Ok(text);
            }
        }

        // Leftover tool context or an empty answer: one final call with
        // tool calling disabled to force a summary.
        self.observer.on_model_call(rounds);
        let final_response = self
            .provider
            .complete(CompletionRequest {
                messages,
                tools: None,
                tool_choice: ToolChoice::None,
                max_tokens: None,
                temperature: None,
            })
            .await?;

        let answer =
            nonempty(&final_response.content).unwrap_or_else(|| COMPLETED_FALLBACK.to_string());
        self.observer.on_answer(&answer);
        Ok(answer)
    }

    fn build_messages(&self, user_message: &str, history: &[IncomingTurn]) -> Vec<Message> {
        let mut messages = vec![Message::system(prompts::system_prompt())];
        for turn in history.iter().filter(|t| t.is_replayable()) {
            match turn.role.as_str() {
                "user" => messages.push(Message::user(&turn.content)),
                "assistant" => messages.push(Message::assistant(&turn.content)),
                _ => {}
            }
        }
        messages.push(Message::user(user_message));
        messages
    }

    fn tool_request(&self, messages: Vec<Message>, tools: &[Tool]) -> CompletionRequest {
        CompletionRequest {
            messages,
            tools: Some(tools.to_vec()),
            tool_choice: ToolChoice::Auto,
            max_tokens: None,
            temperature: None,
        }
    }
}

fn nonempty(content: &Option<String>) -> Option<String> {
    content
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
