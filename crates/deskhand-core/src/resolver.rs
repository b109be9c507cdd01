//! Contact resolution: local cache first, remote CRM search as fallback.

use anyhow::Result;
use deskhand_crm::{ContactFilter, ContactStore, CrmTools};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves a free-text person reference ("Brandon", "Brandon Burgan", an
/// email, a phone number) to zero or more contact records. Prefers the
/// local cache for latency; if the cache query fails, the equivalent
/// remote CRM search runs with the same raw arguments and its payload is
/// returned unmodified. Never creates, updates, or deletes a contact.
pub struct ContactResolver {
    store: Arc<dyn ContactStore>,
    crm: Arc<dyn CrmTools>,
    location_id: String,
    default_limit: u32,
}

impl ContactResolver {
    pub fn new(
        store: Arc<dyn ContactStore>,
        crm: Arc<dyn CrmTools>,
        location_id: String,
        default_limit: u32,
    ) -> Self {
        Self {
            store,
            crm,
            location_id,
            default_limit,
        }
    }

    /// Resolve a query into a JSON payload of contacts: a local cache hit
    /// returns the matched records, the fallback returns whatever the
    /// remote search produced, unranked either way.
    pub async fn resolve(&self, query: Option<&str>, limit: Option<u32>) -> Result<Value> {
        let limit = limit.unwrap_or(self.default_limit);
        let filter = ContactFilter::from_query(query);

        match self.store.search(&self.location_id, &filter, limit).await {
            Ok(contacts) => {
                debug!(
                    count = contacts.len(),
                    "resolved contacts from local cache"
                );
                Ok(serde_json::to_value(contacts)?)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    "contact cache query failed, falling back to remote CRM search"
                );
                self.crm
                    .call_tool(
                        "contacts_get-contacts",
                        &json!({ "query": query, "limit": limit }),
                    )
                    .await
            }
        }
    }
}
