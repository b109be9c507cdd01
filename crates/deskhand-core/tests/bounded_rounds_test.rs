//! Round-budget enforcement: a model that never stops asking for tools
//! must be cut off after the configured number of rounds and still yield
//! a non-empty answer from a forced tool-free call.

mod common;

use common::{orchestrator, seeded_store, RecordingCrm};
use deskhand_providers::mock::{scenarios, MockResponse};
use deskhand_providers::MockProvider;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn greedy_model_is_stopped_after_three_tool_rounds() {
    let provider = Arc::new(scenarios::always_calls_tool(
        "get_pipelines",
        json!({}),
    ));
    let crm = Arc::new(RecordingCrm::new());
    crm.respond_with("opportunities_get-pipelines", json!({"pipelines": []}));
    let orch = orchestrator(provider.clone(), seeded_store(), crm.clone());

    let answer = orch.run_turn("List every pipeline forever", &[]).await.unwrap();

    // Exactly the budget's worth of tool executions, then a summary.
    assert_eq!(crm.call_count(), 3);
    assert!(!answer.is_empty());

    // Initial call + 2 in-loop re-calls + 1 forced tool-free call.
    let requests = provider.get_requests();
    assert_eq!(requests.len(), 4);
    assert!(requests[..3].iter().all(|r| r.tools.is_some()));
    assert!(requests[3].tools.is_none());
}

#[tokio::test]
async fn forced_final_call_answer_is_used_when_present() {
    // Three tool rounds queued, then the default response answers the
    // forced final call.
    let provider = Arc::new(
        MockProvider::new()
            .with_responses(vec![
                MockResponse::tool_call("get_pipelines", json!({})),
                MockResponse::tool_call("get_pipelines", json!({})),
                MockResponse::tool_call("get_pipelines", json!({})),
            ])
            .with_default_response(MockResponse::text("You have no pipelines configured.")),
    );
    let crm = Arc::new(RecordingCrm::new());
    let orch = orchestrator(provider, seeded_store(), crm.clone());

    let answer = orch.run_turn("Show my pipelines", &[]).await.unwrap();

    assert_eq!(answer, "You have no pipelines configured.");
    assert_eq!(crm.call_count(), 3);
}
