//! Contact records and the tiered name/email/phone matching rules.
//!
//! The matching semantics live in one place (`ContactFilter`) so the
//! in-memory store applies them directly and the Postgres store mirrors
//! them in SQL. Matching is case-insensitive substring throughout; results
//! keep whatever order the backing store returns.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A contact from the local cache, synced out-of-band from the CRM.
/// Read-only for this crate: nothing here creates, updates, or deletes one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: String,
    pub location_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub custom_fields: serde_json::Value,
    pub sync_status: String,
    pub date_added: Option<DateTime<Utc>>,
    pub date_updated: Option<DateTime<Utc>>,
}

/// Tiered matching built from a free-text person reference.
///
/// Token count decides the tier:
/// - zero tokens: no filter, most recent contacts
/// - one token: substring of first name OR last name OR full name
/// - two tokens: the full two-word string as a substring of the full name,
///   OR token 1 in the first name AND token 2 in the last name
/// - three or more: the full string as a substring of full name, email, or
///   phone (handles addresses and numbers with spaces)
///
/// Needles are lowercased at construction; haystacks at match time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactFilter {
    Recent,
    SingleToken(String),
    TwoTokens {
        full: String,
        first: String,
        last: String,
    },
    Phrase(String),
}

impl ContactFilter {
    pub fn from_query(query: Option<&str>) -> Self {
        let raw = query.unwrap_or("").trim();
        let tokens: Vec<&str> = raw.split_whitespace().collect();

        match tokens.len() {
            0 => ContactFilter::Recent,
            1 => ContactFilter::SingleToken(tokens[0].to_lowercase()),
            2 => ContactFilter::TwoTokens {
                full: format!("{} {}", tokens[0], tokens[1]).to_lowercase(),
                first: tokens[0].to_lowercase(),
                last: tokens[1].to_lowercase(),
            },
            _ => ContactFilter::Phrase(tokens.join(" ").to_lowercase()),
        }
    }

    /// Apply the filter to one record. `Recent` matches everything; the
    /// store is responsible for recency ordering in that case.
    pub fn matches(&self, record: &ContactRecord) -> bool {
        match self {
            ContactFilter::Recent => true,
            ContactFilter::SingleToken(token) => {
                contains_ci(&record.first_name, token)
                    || contains_ci(&record.last_name, token)
                    || contains_ci(&record.full_name, token)
            }
            ContactFilter::TwoTokens { full, first, last } => {
                contains_ci(&record.full_name, full)
                    || (contains_ci(&record.first_name, first)
                        && contains_ci(&record.last_name, last))
            }
            ContactFilter::Phrase(phrase) => {
                contains_ci(&record.full_name, phrase)
                    || contains_ci(&record.email, phrase)
                    || contains_ci(&record.phone, phrase)
            }
        }
    }
}

fn contains_ci(haystack: &Option<String>, needle: &str) -> bool {
    haystack
        .as_deref()
        .map(|value| value.to_lowercase().contains(needle))
        .unwrap_or(false)
}

/// Read access to the local contact cache, scoped by CRM location and
/// limited to actively synced contacts.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn search(
        &self,
        location_id: &str,
        filter: &ContactFilter,
        limit: u32,
    ) -> Result<Vec<ContactRecord>>;
}
