use anyhow::{Context, Result};
use clap::Parser;
use deskhand_config::Config;
use deskhand_core::{ChatService, TracingObserver};
use deskhand_crm::{ContactStore, MemoryContactStore, PgContactStore};
use deskhand_server::{
    build_router, AppState, IntegrationStore, MemoryIntegrationStore, PgIntegrationStore,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

use deskhand_server::args::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(bind) = &cli.bind {
        config.server.bind_addr = bind.clone();
    }
    if let Some(url) = &cli.database_url {
        config.server.database_url = Some(url.clone());
    }
    config.validate()?;
    // An unregistered tool name is a boot failure, not a runtime surprise.
    deskhand_core::validate_catalog()?;

    let (store, integrations) = build_stores(&config).await?;
    let service = ChatService::new(config.clone(), store, Arc::new(TracingObserver));
    let state = Arc::new(AppState::new(service, integrations));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    info!(addr = %config.server.bind_addr, "deskhand server listening");

    axum::serve(listener, app).await.context("server runtime failure")
}

/// Postgres-backed stores when a database is configured; otherwise the
/// in-memory contact cache and env-based single-tenant credentials.
async fn build_stores(
    config: &Config,
) -> Result<(Arc<dyn ContactStore>, Arc<dyn IntegrationStore>)> {
    match &config.server.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await
                .context("failed to connect to database")?;
            info!("using Postgres contact cache and integration store");
            Ok((
                Arc::new(PgContactStore::new(pool.clone())),
                Arc::new(PgIntegrationStore::new(pool)),
            ))
        }
        None => {
            info!("no database configured, using in-memory stores");
            Ok((
                Arc::new(MemoryContactStore::new()),
                Arc::new(MemoryIntegrationStore::from_env()),
            ))
        }
    }
}

fn initialize_logging(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("deskhand_server={level}").parse().unwrap())
        .add_directive(format!("deskhand_core={level}").parse().unwrap())
        .add_directive(format!("deskhand_crm={level}").parse().unwrap())
        .add_directive(format!("deskhand_providers={level}").parse().unwrap());

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .try_init();
}
