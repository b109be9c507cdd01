//! Service-level degradation: credential preflight guidance and the
//! catch-all failure string. Every path returns something presentable.

mod common;

use common::{full_session, seeded_store, RecordingCrm};
use deskhand_config::Config;
use deskhand_core::{ChatService, Credentials, NullObserver, Session};
use deskhand_crm::{ContactStore, CrmTools};
use deskhand_providers::{mock::MockResponse, LlmProvider, MockProvider};
use std::sync::Arc;

fn service_with_provider(provider: Arc<MockProvider>) -> ChatService {
    let crm = Arc::new(RecordingCrm::new());
    ChatService::with_factories(
        Config::default(),
        seeded_store() as Arc<dyn ContactStore>,
        Arc::new(NullObserver),
        Arc::new(move |_| Ok(provider.clone() as Arc<dyn LlmProvider>)),
        Arc::new(move |_| Ok(crm.clone() as Arc<dyn CrmTools>)),
    )
}

#[tokio::test]
async fn missing_crm_connection_returns_setup_guidance() {
    let service = service_with_provider(Arc::new(MockProvider::new()));
    let session = Session::new("user-1", Credentials::default());

    let reply = service.handle_turn(&session, "Who is Brandon?", &[]).await;

    assert!(reply.contains("connect your GoHighLevel account"));
}

#[tokio::test]
async fn missing_token_returns_reconnect_guidance() {
    let service = service_with_provider(Arc::new(MockProvider::new()));
    let session = Session::new(
        "user-1",
        Credentials {
            location_id: Some("loc-1".into()),
            crm_token: None,
            openai_api_key: Some("sk-test".into()),
        },
    );

    let reply = service.handle_turn(&session, "Who is Brandon?", &[]).await;

    assert!(reply.contains("reconnect"));
}

#[tokio::test]
async fn missing_model_key_returns_key_guidance() {
    let service = service_with_provider(Arc::new(MockProvider::new()));
    let session = Session::new(
        "user-1",
        Credentials {
            location_id: Some("loc-1".into()),
            crm_token: Some("pit".into()),
            openai_api_key: None,
        },
    );

    let reply = service.handle_turn(&session, "Who is Brandon?", &[]).await;

    assert!(reply.contains("API key"));
}

#[tokio::test]
async fn provider_construction_failure_degrades_to_generic_string() {
    let crm = Arc::new(RecordingCrm::new());
    let service = ChatService::with_factories(
        Config::default(),
        seeded_store() as Arc<dyn ContactStore>,
        Arc::new(NullObserver),
        Arc::new(|_| Err(anyhow::anyhow!("provider backend unavailable"))),
        Arc::new(move |_| Ok(crm.clone() as Arc<dyn CrmTools>)),
    );

    let reply = service.handle_turn(&full_session(), "Hi", &[]).await;

    assert!(reply.contains("I encountered an error"));
}

#[tokio::test]
async fn complete_credentials_run_the_full_turn() {
    let provider = Arc::new(MockProvider::new().with_response(MockResponse::text(
        "You have 3 contacts in your CRM.",
    )));
    let service = service_with_provider(provider);

    let reply = service.handle_turn(&full_session(), "How many contacts?", &[]).await;

    assert_eq!(reply, "You have 3 contacts in your CRM.");
}
