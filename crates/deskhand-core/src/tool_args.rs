//! Typed parsing of model-issued tool calls.
//!
//! The model hands back a tool name plus an untrusted JSON argument blob.
//! Both are validated once here, at the boundary, into a tagged union with
//! one variant per catalog tool. Handlers downstream work with typed
//! structs and never re-check fields.

use serde::Deserialize;
use serde_json::Value;

use crate::tool_definitions::assistant_tools;

/// Every tool name the executor can dispatch. Checked against the catalog
/// at startup by [`validate_catalog`].
pub const KNOWN_TOOLS: &[&str] = &[
    "search_contacts",
    "get_contact",
    "create_contact",
    "search_opportunities",
    "get_pipelines",
    "add_contact_tags",
    "get_contact_tasks",
    "search_conversations",
    "get_contact_appointments",
    "list_transactions",
    "send_message",
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchContactsArgs {
    pub query: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GetContactArgs {
    #[serde(rename = "contactId")]
    pub contact_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateContactArgs {
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchOpportunitiesArgs {
    pub query: Option<String>,
    #[serde(rename = "contactId")]
    pub contact_id: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddContactTagsArgs {
    #[serde(rename = "contactId")]
    pub contact_id: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GetContactTasksArgs {
    #[serde(rename = "contactId")]
    pub contact_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchConversationsArgs {
    #[serde(rename = "contactId")]
    pub contact_id: Option<String>,
    pub query: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GetContactAppointmentsArgs {
    #[serde(rename = "contactId")]
    pub contact_id: String,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListTransactionsArgs {
    #[serde(rename = "contactId")]
    pub contact_id: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SendMessageArgs {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(rename = "contactId")]
    pub contact_id: String,
    pub message: String,
}

/// A validated tool call, one variant per catalog tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRequest {
    SearchContacts(SearchContactsArgs),
    GetContact(GetContactArgs),
    CreateContact(CreateContactArgs),
    SearchOpportunities(SearchOpportunitiesArgs),
    GetPipelines,
    AddContactTags(AddContactTagsArgs),
    GetContactTasks(GetContactTasksArgs),
    SearchConversations(SearchConversationsArgs),
    GetContactAppointments(GetContactAppointmentsArgs),
    ListTransactions(ListTransactionsArgs),
    SendMessage(SendMessageArgs),
}

#[derive(Debug, thiserror::Error)]
pub enum ToolParseError {
    #[error("Function {0} not implemented")]
    UnknownTool(String),
    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },
}

impl ToolRequest {
    /// Parse and validate a raw model tool call. Unknown extra fields are
    /// ignored; missing or mistyped required fields are rejected here so
    /// handlers never see them.
    pub fn parse(name: &str, arguments: &Value) -> Result<Self, ToolParseError> {
        fn args<T: for<'de> Deserialize<'de>>(
            tool: &str,
            arguments: &Value,
        ) -> Result<T, ToolParseError> {
            serde_json::from_value(arguments.clone()).map_err(|e| {
                ToolParseError::InvalidArguments {
                    tool: tool.to_string(),
                    message: e.to_string(),
                }
            })
        }

        match name {
            "search_contacts" => Ok(Self::SearchContacts(args(name, arguments)?)),
            "get_contact" => Ok(Self::GetContact(args(name, arguments)?)),
            "create_contact" => Ok(Self::CreateContact(args(name, arguments)?)),
            "search_opportunities" => Ok(Self::SearchOpportunities(args(name, arguments)?)),
            "get_pipelines" => Ok(Self::GetPipelines),
            "add_contact_tags" => Ok(Self::AddContactTags(args(name, arguments)?)),
            "get_contact_tasks" => Ok(Self::GetContactTasks(args(name, arguments)?)),
            "search_conversations" => Ok(Self::SearchConversations(args(name, arguments)?)),
            "get_contact_appointments" => {
                Ok(Self::GetContactAppointments(args(name, arguments)?))
            }
            "list_transactions" => Ok(Self::ListTransactions(args(name, arguments)?)),
            "send_message" => Ok(Self::SendMessage(args(name, arguments)?)),
            _ => Err(ToolParseError::UnknownTool(name.to_string())),
        }
    }
}

/// Startup check that the catalog and the dispatch table agree. A tool
/// declared to the model without a handler, or a handler without a catalog
/// entry, is a deployment mistake that should fail before serving traffic.
pub fn validate_catalog() -> anyhow::Result<()> {
    let catalog: Vec<String> = assistant_tools().into_iter().map(|t| t.name).collect();

    for name in &catalog {
        if !KNOWN_TOOLS.contains(&name.as_str()) {
            anyhow::bail!("catalog tool '{}' has no registered handler", name);
        }
    }

    for name in KNOWN_TOOLS {
        if !catalog.iter().any(|t| t == name) {
            anyhow::bail!("handler '{}' is missing from the tool catalog", name);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_search_contacts() {
        let request =
            ToolRequest::parse("search_contacts", &json!({"query": "Brandon", "limit": 10}))
                .unwrap();
        assert_eq!(
            request,
            ToolRequest::SearchContacts(SearchContactsArgs {
                query: Some("Brandon".to_string()),
                limit: Some(10),
            })
        );
    }

    #[test]
    fn test_parse_search_contacts_empty_arguments() {
        // A malformed argument string decodes to {} upstream; every field
        // is optional here so the call still validates.
        let request = ToolRequest::parse("search_contacts", &json!({})).unwrap();
        assert_eq!(
            request,
            ToolRequest::SearchContacts(SearchContactsArgs {
                query: None,
                limit: None,
            })
        );
    }

    #[test]
    fn test_parse_send_message_requires_triple() {
        let ok = ToolRequest::parse(
            "send_message",
            &json!({"type": "SMS", "contactId": "c1", "message": "hi"}),
        );
        assert!(ok.is_ok());

        let missing = ToolRequest::parse("send_message", &json!({"type": "SMS"}));
        assert!(matches!(
            missing,
            Err(ToolParseError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_mistyped_fields() {
        let result = ToolRequest::parse("add_contact_tags", &json!({"contactId": "c1", "tags": "vip"}));
        assert!(matches!(
            result,
            Err(ToolParseError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn test_parse_ignores_extra_fields() {
        let request = ToolRequest::parse(
            "get_contact",
            &json!({"contactId": "c1", "unexpected": true}),
        );
        assert!(request.is_ok());
    }

    #[test]
    fn test_unknown_tool_error_message() {
        let err = ToolRequest::parse("fly_to_moon", &json!({})).unwrap_err();
        assert_eq!(err.to_string(), "Function fly_to_moon not implemented");
    }

    #[test]
    fn test_catalog_and_handlers_agree() {
        validate_catalog().unwrap();
    }

    #[test]
    fn test_every_catalog_tool_parses_with_valid_args() {
        // Minimal valid arguments per tool; keeps the catalog and parser
        // from drifting apart.
        let samples = vec![
            ("search_contacts", json!({})),
            ("get_contact", json!({"contactId": "c1"})),
            ("create_contact", json!({"firstName": "A"})),
            ("search_opportunities", json!({})),
            ("get_pipelines", json!({})),
            ("add_contact_tags", json!({"contactId": "c1", "tags": ["vip"]})),
            ("get_contact_tasks", json!({"contactId": "c1"})),
            ("search_conversations", json!({})),
            ("get_contact_appointments", json!({"contactId": "c1"})),
            ("list_transactions", json!({})),
            (
                "send_message",
                json!({"type": "SMS", "contactId": "c1", "message": "hi"}),
            ),
        ];

        assert_eq!(samples.len(), KNOWN_TOOLS.len());
        for (name, arguments) in samples {
            assert!(
                ToolRequest::parse(name, &arguments).is_ok(),
                "tool {} failed to parse valid arguments",
                name
            );
        }
    }
}
