//! MCP (Model Context Protocol) client for the CRM's tool endpoint.
//!
//! The CRM exposes its operations as named MCP tools behind a single HTTP
//! endpoint speaking JSON-RPC. Each call is identified by a fixed tool-name
//! string plus a flat argument map; responses carry the payload as text
//! content items. The endpoint answers either plain JSON or a single SSE
//! frame wrapping it, so both shapes are handled here.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Remote CRM tool invocation, behind a trait so the executor can be
/// exercised against a scripted implementation in tests.
#[async_trait]
pub trait CrmTools: Send + Sync {
    /// Invoke a named remote tool with a flat argument map and return its
    /// JSON payload. Errors here are the caller's to convert into
    /// user-presentable tool results.
    async fn call_tool(&self, name: &str, arguments: &Value) -> Result<Value>;
}

/// JSON-RPC over HTTP client for one tenant's MCP session.
/// Created per request from the caller's stored credentials.
pub struct McpClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    location_id: String,
    next_id: AtomicI64,
}

impl McpClient {
    pub fn new(
        endpoint: String,
        token: String,
        location_id: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build MCP HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            token,
            location_id,
            next_id: AtomicI64::new(1),
        })
    }

    fn next_request_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    async fn send_request(&self, request: Value) -> Result<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("locationId", &self.location_id)
            .header("Accept", "application/json, text/event-stream")
            .json(&request)
            .send()
            .await
            .context("failed to reach the CRM tool endpoint")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read CRM tool response")?;

        if !status.is_success() {
            anyhow::bail!("CRM tool endpoint returned {}: {}", status, body);
        }

        let response: Value =
            parse_response_body(&body).context("invalid JSON from CRM tool endpoint")?;

        // Check for JSON-RPC error
        if let Some(err) = response.get("error") {
            anyhow::bail!("CRM tool error: {}", err);
        }

        Ok(response)
    }
}

#[async_trait]
impl CrmTools for McpClient {
    async fn call_tool(&self, name: &str, arguments: &Value) -> Result<Value> {
        // The endpoint expects arguments to be an object, never null.
        let args = if arguments.is_null() {
            serde_json::json!({})
        } else {
            arguments.clone()
        };

        debug!(tool = name, "calling remote CRM tool");

        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": self.next_request_id(),
            "method": "tools/call",
            "params": {
                "name": name,
                "arguments": args
            }
        });

        let response = self.send_request(request).await?;
        Ok(extract_tool_payload(&response))
    }
}

/// The endpoint may wrap the JSON-RPC response in a single SSE frame
/// (`event: message` / `data: {...}`). Unwrap it when present.
fn parse_response_body(body: &str) -> Result<Value> {
    let trimmed = body.trim();
    if trimmed.starts_with("event:") || trimmed.starts_with("data:") {
        let data = trimmed
            .lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .map(str::trim)
            .last()
            .unwrap_or("");
        return serde_json::from_str(data).map_err(Into::into);
    }
    serde_json::from_str(trimmed).map_err(Into::into)
}

/// Extract the tool payload from a JSON-RPC result. Text content items are
/// joined and re-parsed as JSON where possible so callers see structured
/// data instead of an escaped string.
fn extract_tool_payload(response: &Value) -> Value {
    let result = match response.get("result") {
        Some(result) => result,
        None => {
            warn!("CRM tool response had no result field");
            return Value::Null;
        }
    };

    let text = result
        .get("content")
        .and_then(|c| c.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("text").and_then(|t| t.as_str()))
                .collect::<Vec<_>>()
                .join("\n")
        });

    match text {
        Some(text) if !text.is_empty() => {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        }
        _ => result.clone(),
    }
}
