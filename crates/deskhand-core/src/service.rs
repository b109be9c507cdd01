//! Request-scoped wiring for one chat turn. The service verifies the
//! caller's credentials, builds a provider and CRM client for exactly
//! this request, runs the orchestrator under a turn timeout, and always
//! produces a user-presentable string. Nothing escapes as an error.

use anyhow::Result;
use deskhand_config::Config;
use deskhand_crm::{ContactStore, CrmTools, McpClient};
use deskhand_providers::{LlmProvider, OpenAiProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::executor::Executor;
use crate::observer::TurnObserver;
use crate::orchestrator::{IncomingTurn, Orchestrator};
use crate::resolver::ContactResolver;
use crate::session::{Session, VerifiedCredentials};

const GENERIC_FAILURE: &str =
    "I encountered an error while processing your request. Please try again.";

type ProviderFactory =
    Arc<dyn Fn(&VerifiedCredentials) -> Result<Arc<dyn LlmProvider>> + Send + Sync>;
type CrmFactory = Arc<dyn Fn(&VerifiedCredentials) -> Result<Arc<dyn CrmTools>> + Send + Sync>;

pub struct ChatService {
    config: Config,
    store: Arc<dyn ContactStore>,
    observer: Arc<dyn TurnObserver>,
    provider_factory: ProviderFactory,
    crm_factory: CrmFactory,
}

impl ChatService {
    pub fn new(config: Config, store: Arc<dyn ContactStore>, observer: Arc<dyn TurnObserver>) -> Self {
        let model = config.model.clone();
        let crm = config.crm.clone();

        let provider_factory: ProviderFactory = Arc::new(move |creds: &VerifiedCredentials| {
            let provider = OpenAiProvider::new(
                creds.openai_api_key.clone(),
                Some(model.model.clone()),
                model.base_url.clone(),
                model.max_tokens,
                model.temperature,
            )?;
            Ok(Arc::new(provider) as Arc<dyn LlmProvider>)
        });

        let crm_factory: CrmFactory = Arc::new(move |creds: &VerifiedCredentials| {
            let client = McpClient::new(
                crm.mcp_url.clone(),
                creds.crm_token.clone(),
                creds.location_id.clone(),
                Duration::from_secs(crm.request_timeout_seconds),
            )?;
            Ok(Arc::new(client) as Arc<dyn CrmTools>)
        });

        Self {
            config,
            store,
            observer,
            provider_factory,
            crm_factory,
        }
    }

    /// Same wiring with the external collaborators swapped out. Used by
    /// tests and by callers embedding the service behind other transports.
    pub fn with_factories(
        config: Config,
        store: Arc<dyn ContactStore>,
        observer: Arc<dyn TurnObserver>,
        provider_factory: ProviderFactory,
        crm_factory: CrmFactory,
    ) -> Self {
        Self {
            config,
            store,
            observer,
            provider_factory,
            crm_factory,
        }
    }

    /// Handle one chat message. Always returns a string fit for the end
    /// user: credential preflight failures become setup guidance, and any
    /// unexpected failure inside the turn becomes a generic apology.
    pub async fn handle_turn(
        &self,
        session: &Session,
        message: &str,
        history: &[IncomingTurn],
    ) -> String {
        let verified = match session.verify() {
            Ok(v) => v,
            Err(missing) => {
                warn!(user = %session.user_id, %missing, "credential preflight failed");
                return missing.guidance().to_string();
            }
        };

        info!(user = %session.user_id, location = %verified.location_id, "handling chat turn");

        let turn_timeout = Duration::from_secs(self.config.assistant.turn_timeout_seconds);
        match tokio::time::timeout(turn_timeout, self.run_turn(&verified, message, history)).await {
            Ok(Ok(answer)) => answer,
            Ok(Err(e)) => {
                error!(error = %format!("{e:#}"), "chat turn failed");
                GENERIC_FAILURE.to_string()
            }
            Err(_) => {
                error!(timeout_s = turn_timeout.as_secs(), "chat turn timed out");
                GENERIC_FAILURE.to_string()
            }
        }
    }

    async fn run_turn(
        &self,
        creds: &VerifiedCredentials,
        message: &str,
        history: &[IncomingTurn],
    ) -> Result<String> {
        let provider = (self.provider_factory)(creds)?;
        let crm = (self.crm_factory)(creds)?;

        let resolver = ContactResolver::new(
            Arc::clone(&self.store),
            Arc::clone(&crm),
            creds.location_id.clone(),
            self.config.assistant.contact_search_limit,
        );
        let executor = Executor::new(resolver, crm, &self.config.assistant);
        let orchestrator = Orchestrator::new(
            provider,
            executor,
            Arc::clone(&self.observer),
            self.config.assistant.max_tool_rounds,
        );

        orchestrator.run_turn(message, history).await
    }
}
