//! Turn observation hooks. The orchestrator reports what it is doing
//! through this trait instead of logging or calling back out over HTTP,
//! so the server can attach tracing while tests can attach nothing.

use deskhand_providers::ToolCall;
use tracing::{debug, warn};

use crate::executor::ToolOutcome;

pub trait TurnObserver: Send + Sync {
    /// A model call is about to be issued with `round` tool rounds used.
    fn on_model_call(&self, round: u32) {
        let _ = round;
    }

    /// The model requested a tool call.
    fn on_tool_requested(&self, call: &ToolCall) {
        let _ = call;
    }

    /// A tool call finished (success or converted failure).
    fn on_tool_completed(&self, call: &ToolCall, outcome: &ToolOutcome) {
        let _ = (call, outcome);
    }

    /// The round budget ran out with the model still asking for tools.
    fn on_round_budget_exhausted(&self, limit: u32) {
        let _ = limit;
    }

    /// The final answer text was produced.
    fn on_answer(&self, text: &str) {
        let _ = text;
    }
}

/// Observer that ignores everything. Used by tests.
pub struct NullObserver;

impl TurnObserver for NullObserver {}

/// Observer that forwards turn progress to `tracing`.
pub struct TracingObserver;

impl TurnObserver for TracingObserver {
    fn on_model_call(&self, round: u32) {
        debug!(round, "issuing model call");
    }

    fn on_tool_requested(&self, call: &ToolCall) {
        debug!(tool = %call.name, id = %call.id, "model requested tool");
    }

    fn on_tool_completed(&self, call: &ToolCall, outcome: &ToolOutcome) {
        if outcome.success {
            debug!(tool = %call.name, "tool completed");
        } else {
            warn!(
                tool = %call.name,
                error = outcome.error.as_deref().unwrap_or("unknown"),
                "tool failed"
            );
        }
    }

    fn on_round_budget_exhausted(&self, limit: u32) {
        warn!(limit, "tool round budget exhausted, forcing final answer");
    }

    fn on_answer(&self, text: &str) {
        debug!(chars = text.len(), "turn produced answer");
    }
}
