//! Per-caller credential resolution. The chat handler looks the caller's
//! integration credentials up here; what it finds (or fails to find)
//! decides whether the turn runs or the user gets setup guidance.

use anyhow::{Context, Result};
use async_trait::async_trait;
use deskhand_core::Credentials;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

#[async_trait]
pub trait IntegrationStore: Send + Sync {
    /// Credentials for the given caller. A caller with no integrations at
    /// all yields empty credentials, not an error; the preflight in the
    /// core turns that into guidance.
    async fn credentials_for(&self, user_id: &str) -> Result<Credentials>;
}

/// Reads integration rows synced by the platform's OAuth flows.
pub struct PgIntegrationStore {
    pool: PgPool,
}

impl PgIntegrationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IntegrationStore for PgIntegrationStore {
    async fn credentials_for(&self, user_id: &str) -> Result<Credentials> {
        let row = sqlx::query(
            "SELECT crm_token, location_id, openai_api_key \
             FROM user_integrations WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("integration lookup failed")?;

        let Some(row) = row else {
            debug!(user_id, "no integration row for caller");
            return Ok(Credentials::default());
        };

        Ok(Credentials {
            crm_token: row.try_get("crm_token").ok().flatten(),
            location_id: row.try_get("location_id").ok().flatten(),
            openai_api_key: row.try_get("openai_api_key").ok().flatten(),
        })
    }
}

/// In-memory store for tests and single-tenant development runs.
pub struct MemoryIntegrationStore {
    by_user: Mutex<HashMap<String, Credentials>>,
    default: Option<Credentials>,
}

impl MemoryIntegrationStore {
    pub fn new() -> Self {
        Self {
            by_user: Mutex::new(HashMap::new()),
            default: None,
        }
    }

    /// Single-tenant mode: every caller resolves to credentials taken
    /// from the environment (OPENAI_API_KEY, DESKHAND_CRM_TOKEN,
    /// DESKHAND_LOCATION_ID).
    pub fn from_env() -> Self {
        let nonempty = |var: &str| std::env::var(var).ok().filter(|v| !v.is_empty());
        Self {
            by_user: Mutex::new(HashMap::new()),
            default: Some(Credentials {
                crm_token: nonempty("DESKHAND_CRM_TOKEN"),
                location_id: nonempty("DESKHAND_LOCATION_ID"),
                openai_api_key: nonempty("OPENAI_API_KEY"),
            }),
        }
    }

    pub fn insert(&self, user_id: &str, credentials: Credentials) {
        self.by_user
            .lock()
            .unwrap()
            .insert(user_id.to_string(), credentials);
    }
}

impl Default for MemoryIntegrationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntegrationStore for MemoryIntegrationStore {
    async fn credentials_for(&self, user_id: &str) -> Result<Credentials> {
        if let Some(creds) = self.by_user.lock().unwrap().get(user_id) {
            return Ok(creds.clone());
        }
        Ok(self.default.clone().unwrap_or_default())
    }
}
