//! Warden - short-lived authentication sessions
//!
//! Main entry point for the Warden CLI.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

mod commands;

use commands::{create, profile, validate};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Warden - short-lived authentication sessions
#[derive(Parser)]
#[command(name = "warden")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to a config file (default: ./warden.toml or the user config dir)
    #[arg(long, global = true, env = "WARDEN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a session for a user and print its identifier
    Create(create::CreateArgs),

    /// Check a session identifier and print the session
    Validate(validate::ValidateArgs),

    /// Fetch a user's profile from the identity service
    Profile(profile::ProfileArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = warden_config::load_settings(cli.config.as_deref())?;

    // Console logs go to stderr; JSON logs to a daily file when log_dir is set
    let filter = if cli.verbose {
        "warden=debug,warden_session=debug,warden_client=debug,info"
    } else {
        "warden=info,warden_session=info,warden_client=info,warn"
    };

    use tracing_subscriber::prelude::*;
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(tracing_subscriber::EnvFilter::new(filter));

    let (file_layer, _guard) = match &loaded.settings.log_dir {
        Some(log_dir) => {
            let file_appender = tracing_appender::rolling::daily(log_dir, "warden.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "warden=trace,warden_session=trace,warden_client=trace,info",
                ));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    if let Some(path) = &loaded.source {
        info!(path = %path.display(), "Loaded config");
    }
    for warning in &loaded.warnings {
        warn!("{}", warning);
    }

    // Create context for commands
    let ctx = commands::Context {
        loaded: Arc::new(loaded),
        json_output: cli.json,
    };

    // Dispatch to command handlers
    match cli.command {
        Commands::Create(args) => create::run(args, &ctx).await,
        Commands::Validate(args) => validate::run(args, &ctx).await,
        Commands::Profile(args) => profile::run(args, &ctx).await,
    }
}
