//! Tool definitions for the assistant's callable capabilities.
//!
//! This module contains the JSON schema definitions for all tools exposed
//! to the language model. The set is static, ordering is stable, and only
//! top-level primitive parameter types are declared.

use deskhand_providers::Tool;
use serde_json::json;

/// Create the tool definitions handed to the model with every turn.
pub fn assistant_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "search_contacts".to_string(),
            description: "Search the CRM for contacts by name, email, or phone. Returns matching contact records. Call this first whenever the user refers to a person by name.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Free-text person reference: a first name, full name, email address, or phone number. Omit to list the most recent contacts."
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of contacts to return (default 50)"
                    }
                },
                "required": []
            }),
        },
        Tool {
            name: "get_contact".to_string(),
            description: "Fetch a single contact's full record by its contact id.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "contactId": {
                        "type": "string",
                        "description": "The CRM contact id"
                    }
                },
                "required": ["contactId"]
            }),
        },
        Tool {
            name: "create_contact".to_string(),
            description: "Create a new contact in the CRM. Provide at least a name, email, or phone number.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "firstName": { "type": "string" },
                    "lastName": { "type": "string" },
                    "email": { "type": "string" },
                    "phone": { "type": "string" }
                },
                "required": []
            }),
        },
        Tool {
            name: "search_opportunities".to_string(),
            description: "Search sales opportunities, optionally scoped to one contact.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Free-text search over opportunity names"
                    },
                    "contactId": {
                        "type": "string",
                        "description": "Restrict results to opportunities belonging to this contact"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of opportunities to return"
                    }
                },
                "required": []
            }),
        },
        Tool {
            name: "get_pipelines".to_string(),
            description: "List the sales pipelines and their stages for this account.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
        Tool {
            name: "add_contact_tags".to_string(),
            description: "Add one or more tags to an existing contact.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "contactId": {
                        "type": "string",
                        "description": "The CRM contact id"
                    },
                    "tags": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Tags to add"
                    }
                },
                "required": ["contactId", "tags"]
            }),
        },
        Tool {
            name: "get_contact_tasks".to_string(),
            description: "List all tasks attached to a contact. Resolve the contact id with search_contacts first.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "contactId": {
                        "type": "string",
                        "description": "The CRM contact id"
                    }
                },
                "required": ["contactId"]
            }),
        },
        Tool {
            name: "search_conversations".to_string(),
            description: "Search message conversations, optionally scoped to one contact.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "contactId": { "type": "string" },
                    "query": { "type": "string" }
                },
                "required": []
            }),
        },
        Tool {
            name: "get_contact_appointments".to_string(),
            description: "List calendar appointments for a contact within an optional date window.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "contactId": {
                        "type": "string",
                        "description": "The CRM contact id"
                    },
                    "startDate": {
                        "type": "string",
                        "description": "ISO date lower bound"
                    },
                    "endDate": {
                        "type": "string",
                        "description": "ISO date upper bound"
                    }
                },
                "required": ["contactId"]
            }),
        },
        Tool {
            name: "list_transactions".to_string(),
            description: "List payment transactions, optionally scoped to one contact.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "contactId": { "type": "string" },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of transactions to return"
                    }
                },
                "required": []
            }),
        },
        Tool {
            name: "send_message".to_string(),
            description: "Send an SMS or email to a contact. Resolve the contact id first, compose the message to match the user's intent, and confirm to the user after it is sent.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "type": {
                        "type": "string",
                        "enum": ["SMS", "Email"],
                        "description": "Message channel"
                    },
                    "contactId": {
                        "type": "string",
                        "description": "The CRM contact id"
                    },
                    "message": {
                        "type": "string",
                        "description": "The message body to send"
                    }
                },
                "required": ["type", "contactId", "message"]
            }),
        },
    ]
}
