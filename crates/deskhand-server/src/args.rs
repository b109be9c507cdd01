//! CLI argument parsing for the Deskhand server.

use clap::Parser;

#[derive(Parser, Clone)]
#[command(name = "deskhand-server")]
#[command(about = "CRM chat assistant HTTP server")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Bind address override (defaults to the configured server.bind_addr)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Database URL override (defaults to the configured server.database_url)
    #[arg(long, value_name = "URL")]
    pub database_url: Option<String>,
}
