//! HTTP surface for the Deskhand assistant: one chat endpoint that always
//! answers 200 with a user-presentable string, plus a health probe.

pub mod args;
pub mod integrations;
pub mod routes;
pub mod state;

pub use integrations::{IntegrationStore, MemoryIntegrationStore, PgIntegrationStore};
pub use routes::build_router;
pub use state::AppState;
