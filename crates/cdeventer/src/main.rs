//! cdeventer - turn Tekton CDEvent Runs into delivered CloudEvents
//!
//! Main entry point for the cdeventer CLI.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::prelude::*;

mod commands;

use commands::{config, reconcile, render};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// cdeventer - turn Tekton CDEvent Runs into delivered CloudEvents
#[derive(Parser)]
#[command(name = "cdeventer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Event sink URL (overrides [sink] url)
    #[arg(long, global = true, env = "CDEVENTER_SINK_URL")]
    pub sink: Option<String>,

    /// User config directory (default: ~/.config/cdeventer)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile Run manifests and deliver their CDEvents
    Reconcile(reconcile::ReconcileArgs),

    /// Build and print the CloudEvent for a Run without sending it
    Render(render::RenderArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = cdeventer_config::load_config(Path::new("."), cli.config_dir.as_deref());
    let logging = loaded.config.logging();

    // Initialize tracing: console on stderr, plus rotating JSON file when configured
    let filter = if cli.verbose {
        "cdeventer=debug,cdeventer_reconciler=debug,cdeventer_client=debug,cdeventer_config=debug,info".to_string()
    } else {
        logging.level.clone().unwrap_or_else(|| {
            "cdeventer=info,cdeventer_reconciler=info,cdeventer_client=info,warn".to_string()
        })
    };

    let (file_layer, _guard) = match &logging.dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "cdeventer.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "cdeventer=trace,cdeventer_reconciler=trace,cdeventer_client=trace,cdeventer_config=trace,info",
                ));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(file_layer)
        .init();

    for warning in &loaded.warnings {
        warn!("{}", warning);
    }

    // Create context for commands
    let ctx = commands::Context {
        config: loaded,
        sink_url: cli.sink,
        config_dir: cli.config_dir,
        json_output: cli.json,
        verbose: cli.verbose,
    };

    // Dispatch to command handlers
    match cli.command {
        Commands::Reconcile(args) => reconcile::run(args, &ctx).await,
        Commands::Render(args) => render::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}
