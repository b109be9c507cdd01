//! Contact resolution source selection: local cache first, remote CRM
//! search only when the cache query fails.

mod common;

use common::{seeded_store, RecordingCrm, LOCATION};
use deskhand_core::ContactResolver;
use deskhand_crm::CrmTools;
use serde_json::json;
use std::sync::Arc;

fn resolver(
    store: Arc<deskhand_crm::MemoryContactStore>,
    crm: Arc<RecordingCrm>,
) -> ContactResolver {
    ContactResolver::new(store, crm as Arc<dyn CrmTools>, LOCATION.to_string(), 50)
}

#[tokio::test]
async fn cache_hit_never_touches_the_remote_crm() {
    let crm = Arc::new(RecordingCrm::new());
    let resolver = resolver(seeded_store(), crm.clone());

    let payload = resolver.resolve(Some("bran"), None).await.unwrap();

    let contacts = payload.as_array().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0]["id"], "c-brandon");
    assert_eq!(crm.call_count(), 0);
}

#[tokio::test]
async fn cache_failure_falls_back_to_remote_search() {
    let store = seeded_store();
    store.set_failing(true);
    let crm = Arc::new(RecordingCrm::new());
    crm.respond_with(
        "contacts_get-contacts",
        json!({"contacts": [{"id": "remote-1", "contactName": "Brandon Burgan"}]}),
    );
    let resolver = resolver(store, crm.clone());

    let payload = resolver.resolve(Some("Brandon Burgan"), None).await.unwrap();

    // The remote payload comes back unmodified.
    assert_eq!(payload["contacts"][0]["id"], "remote-1");
    let calls = crm.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "contacts_get-contacts");
    assert_eq!(calls[0].1["query"], "Brandon Burgan");
    assert_eq!(calls[0].1["limit"], 50);
}

#[tokio::test]
async fn empty_query_returns_recent_contacts() {
    let crm = Arc::new(RecordingCrm::new());
    let resolver = resolver(seeded_store(), crm);

    let payload = resolver.resolve(None, Some(2)).await.unwrap();
    let contacts = payload.as_array().unwrap();
    assert_eq!(contacts.len(), 2);
}
