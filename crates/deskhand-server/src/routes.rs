//! Route handlers. The chat endpoint answers 200 for every request it can
//! parse: integration failures, model failures, and missing credentials
//! all come back as a guidance string in the response body.

use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use deskhand_core::{IncomingTurn, Session};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<IncomingTurn>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Caller identity, resolved upstream by the platform gateway and passed
/// through as a header.
fn caller_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

async fn chat(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let Some(user_id) = caller_id(&headers) else {
        return Json(ChatResponse {
            response: "I couldn't identify your account. Please sign in and try again."
                .to_string(),
        });
    };

    // A lookup failure degrades to empty credentials; the preflight then
    // tells the user which integration step is missing.
    let credentials = match state.integrations.credentials_for(&user_id).await {
        Ok(creds) => creds,
        Err(e) => {
            warn!(user = %user_id, error = %format!("{e:#}"), "integration lookup failed");
            Default::default()
        }
    };

    let session = Session::new(user_id, credentials);
    let response = state
        .service
        .handle_turn(&session, &body.message, &body.conversation_history)
        .await;

    Json(ChatResponse { response })
}
