//! Per-request caller identity and credentials. Nothing here is shared
//! across requests; the service builds a fresh `Session` for every turn.

use thiserror::Error;

/// Credentials resolved for the caller before the turn starts. All three
/// are required; `Session::verify` names the first one missing.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Remote CRM access token (PIT or OAuth access token).
    pub crm_token: Option<String>,
    /// CRM location (sub-account) the caller operates in.
    pub location_id: Option<String>,
    /// Model provider API key.
    pub openai_api_key: Option<String>,
}

/// Which integration step the caller still needs to complete. Each variant
/// maps to an instructional string, never a raw error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MissingCredential {
    #[error("no CRM location configured")]
    CrmConnection,
    #[error("no CRM access token available")]
    CrmToken,
    #[error("no model API key configured")]
    OpenAiKey,
}

impl MissingCredential {
    /// The user-facing guidance string returned in place of an answer.
    pub fn guidance(&self) -> &'static str {
        match self {
            MissingCredential::CrmConnection => {
                "It looks like your CRM isn't connected yet. Please connect your GoHighLevel account in the integrations settings, then try again."
            }
            MissingCredential::CrmToken => {
                "Your CRM connection needs to be refreshed. Please reconnect your GoHighLevel integration in settings so I can access your CRM data."
            }
            MissingCredential::OpenAiKey => {
                "No AI model API key is configured for your account. Please add your OpenAI API key in settings to enable the assistant."
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub credentials: Credentials,
}

impl Session {
    pub fn new(user_id: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            user_id: user_id.into(),
            credentials,
        }
    }

    /// Check preconditions in a fixed order: location, then token, then
    /// model key. Returns the resolved triple so callers get owned values.
    pub fn verify(&self) -> Result<VerifiedCredentials, MissingCredential> {
        let location_id = self
            .credentials
            .location_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(MissingCredential::CrmConnection)?;
        let crm_token = self
            .credentials
            .crm_token
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(MissingCredential::CrmToken)?;
        let openai_api_key = self
            .credentials
            .openai_api_key
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(MissingCredential::OpenAiKey)?;

        Ok(VerifiedCredentials {
            location_id: location_id.to_string(),
            crm_token: crm_token.to_string(),
            openai_api_key: openai_api_key.to_string(),
        })
    }
}

/// All three credentials present and non-empty.
#[derive(Debug, Clone)]
pub struct VerifiedCredentials {
    pub location_id: String,
    pub crm_token: String,
    pub openai_api_key: String,
}
