//! Tool execution: routes validated tool requests to the local cache or
//! the remote CRM and normalizes every result into a `ToolOutcome`.
//!
//! Tool failure is data, not control flow: nothing here returns an error
//! to the orchestrator. A failed remote call, a timeout, or a known
//! capability gap all become JSON the model can read and react to.

use deskhand_config::AssistantConfig;
use deskhand_crm::CrmTools;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

use crate::resolver::ContactResolver;
use crate::tool_args::{ToolParseError, ToolRequest};

const RECONNECT_HINT: &str =
    "The CRM integration may need reconnecting. Ask the user to check their CRM connection in settings.";

const CALENDAR_GAP: &str =
    "The CRM's calendar API cannot filter events by contact; it only filters by user, calendar, or group.";

const CALENDAR_ALTERNATIVE: &str =
    "Offer to list all calendar events in a date window instead, and tell the user about this limitation.";

/// Normalized result of one tool invocation, serialized into the tool-role
/// message the model reads next round.
#[derive(Debug, Clone, Serialize)]
pub struct ToolOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ToolOutcome {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            hint: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            hint: None,
        }
    }

    pub fn error_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            hint: Some(hint.into()),
        }
    }

    pub fn from_parse_error(error: ToolParseError) -> Self {
        Self::error(error.to_string())
    }

    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{\"success\":false}".to_string())
    }
}

pub struct Executor {
    resolver: ContactResolver,
    crm: Arc<dyn CrmTools>,
    remote_page_size: u32,
    tool_timeout: Duration,
}

impl Executor {
    pub fn new(resolver: ContactResolver, crm: Arc<dyn CrmTools>, config: &AssistantConfig) -> Self {
        Self {
            resolver,
            crm,
            remote_page_size: config.remote_page_size,
            tool_timeout: Duration::from_secs(config.tool_timeout_seconds),
        }
    }

    /// Execute one validated tool request. Never fails: every error path
    /// is converted into an outcome the model can present to the user.
    pub async fn execute(&self, request: &ToolRequest) -> ToolOutcome {
        match self.dispatch(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %format!("{e:#}"), "tool execution failed");
                ToolOutcome::error_with_hint(format!("{e:#}"), RECONNECT_HINT)
            }
        }
    }

    async fn dispatch(&self, request: &ToolRequest) -> anyhow::Result<ToolOutcome> {
        match request {
            ToolRequest::SearchContacts(args) => {
                let contacts = self
                    .resolver
                    .resolve(args.query.as_deref(), args.limit)
                    .await?;
                Ok(ToolOutcome::ok(contacts))
            }

            ToolRequest::GetContact(args) => {
                self.call_remote(
                    "contacts_get-contact",
                    json!({ "contactId": args.contact_id }),
                )
                .await
            }

            ToolRequest::CreateContact(args) => {
                self.call_remote(
                    "contacts_create-contact",
                    json!({
                        "firstName": args.first_name,
                        "lastName": args.last_name,
                        "email": args.email,
                        "phone": args.phone,
                    }),
                )
                .await
            }

            ToolRequest::SearchOpportunities(args) => {
                self.call_remote(
                    "opportunities_search-opportunity",
                    json!({
                        "query": args.query,
                        "contactId": args.contact_id,
                        "limit": args.limit.unwrap_or(self.remote_page_size),
                    }),
                )
                .await
            }

            ToolRequest::GetPipelines => {
                self.call_remote("opportunities_get-pipelines", json!({})).await
            }

            ToolRequest::AddContactTags(args) => {
                self.call_remote(
                    "contacts_add-tags",
                    json!({
                        "contactId": args.contact_id,
                        "tags": args.tags,
                    }),
                )
                .await
            }

            ToolRequest::GetContactTasks(args) => {
                self.call_remote(
                    "contacts_get-all-tasks",
                    json!({ "contactId": args.contact_id }),
                )
                .await
            }

            // Known capability gap: per-contact calendar filtering does
            // not exist upstream. Disclose it rather than returning wrong
            // data for the contact.
            ToolRequest::GetContactAppointments(_) => Ok(ToolOutcome::error_with_hint(
                CALENDAR_GAP,
                CALENDAR_ALTERNATIVE,
            )),

            ToolRequest::SearchConversations(_) => Ok(ToolOutcome::error(
                "Conversation search is not yet implemented.",
            )),

            ToolRequest::ListTransactions(args) => {
                self.call_remote(
                    "payments_list-transactions",
                    json!({
                        "contactId": args.contact_id,
                        "limit": args.limit.unwrap_or(self.remote_page_size),
                    }),
                )
                .await
            }

            // The remote send-message tool namespaces its body parameters.
            ToolRequest::SendMessage(args) => {
                self.call_remote(
                    "conversations_send-a-new-message",
                    json!({
                        "body_type": args.message_type,
                        "body_contactId": args.contact_id,
                        "body_message": args.message,
                    }),
                )
                .await
            }
        }
    }

    async fn call_remote(&self, tool: &str, arguments: Value) -> anyhow::Result<ToolOutcome> {
        debug!(tool, "dispatching remote CRM tool");

        let call = self.crm.call_tool(tool, &arguments);
        match tokio::time::timeout(self.tool_timeout, call).await {
            Ok(Ok(data)) => Ok(ToolOutcome::ok(data)),
            Ok(Err(e)) => Ok(ToolOutcome::error_with_hint(
                format!("{e:#}"),
                RECONNECT_HINT,
            )),
            Err(_) => Ok(ToolOutcome::error_with_hint(
                format!(
                    "CRM tool '{}' timed out after {}s",
                    tool,
                    self.tool_timeout.as_secs()
                ),
                RECONNECT_HINT,
            )),
        }
    }
}
