//! Shared fixtures for the integration tests: a recording CRM tool stub,
//! a seeded contact cache, and a fully-populated session.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use deskhand_config::Config;
use deskhand_core::{ContactResolver, Credentials, Executor, NullObserver, Orchestrator, Session};
use deskhand_crm::{ContactRecord, CrmTools, MemoryContactStore};
use deskhand_providers::LlmProvider;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub const LOCATION: &str = "loc-1";

/// CRM tool stub that records every call and replays canned payloads.
pub struct RecordingCrm {
    calls: Mutex<Vec<(String, Value)>>,
    responses: Mutex<HashMap<String, Value>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingCrm {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            responses: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
        }
    }

    pub fn respond_with(&self, tool: &str, payload: Value) {
        self.responses.lock().unwrap().insert(tool.to_string(), payload);
    }

    pub fn fail_tool(&self, tool: &str) {
        self.failing.lock().unwrap().insert(tool.to_string());
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CrmTools for RecordingCrm {
    async fn call_tool(&self, name: &str, arguments: &Value) -> anyhow::Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((name.to_string(), arguments.clone()));

        if self.failing.lock().unwrap().contains(name) {
            anyhow::bail!("CRM returned 502 for tool '{name}'");
        }

        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_else(|| json!({ "items": [] })))
    }
}

pub fn contact(id: &str, first: &str, last: &str, email: &str, phone: &str) -> ContactRecord {
    ContactRecord {
        id: id.to_string(),
        location_id: LOCATION.to_string(),
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        full_name: Some(format!("{first} {last}")),
        email: Some(email.to_string()),
        phone: Some(phone.to_string()),
        tags: vec![],
        custom_fields: json!({}),
        sync_status: "active".to_string(),
        date_added: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
        date_updated: None,
    }
}

pub fn seeded_store() -> Arc<MemoryContactStore> {
    Arc::new(MemoryContactStore::with_records(vec![
        contact("c-brandon", "Brandon", "Burgan", "brandon@example.com", "+15551230001"),
        contact("c-alice", "Alice", "Nguyen", "alice@example.com", "+15551230002"),
        contact("c-bob", "Bob", "Marsh", "bob@example.com", "+15551230003"),
    ]))
}

pub fn full_session() -> Session {
    Session::new(
        "user-1",
        Credentials {
            crm_token: Some("pit-token".to_string()),
            location_id: Some(LOCATION.to_string()),
            openai_api_key: Some("sk-test".to_string()),
        },
    )
}

/// Orchestrator over a seeded memory cache and the given provider/CRM,
/// using the default round budget.
pub fn orchestrator(
    provider: Arc<dyn LlmProvider>,
    store: Arc<MemoryContactStore>,
    crm: Arc<RecordingCrm>,
) -> Orchestrator {
    let config = Config::default();
    let resolver = ContactResolver::new(
        store,
        crm.clone() as Arc<dyn CrmTools>,
        LOCATION.to_string(),
        config.assistant.contact_search_limit,
    );
    let executor = Executor::new(resolver, crm as Arc<dyn CrmTools>, &config.assistant);
    Orchestrator::new(
        provider,
        executor,
        Arc::new(NullObserver),
        config.assistant.max_tool_rounds,
    )
}
