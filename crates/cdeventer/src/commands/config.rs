//! Config command - configuration management.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use console::style;

use cdeventer_config::{CdeventerConfig, PROJECT_CONFIG_FILE, SinkConfig};

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show resolved configuration
    Show,

    /// Show configuration file paths and whether they were loaded
    Path,

    /// Initialize a config file with defaults
    Init {
        /// Create project-local config (./cdeventer.toml) instead of user config
        #[arg(long)]
        local: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Path => cmd_path(ctx),
        ConfigCommand::Init { local, force } => cmd_init(ctx, local, force),
    }
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let loaded = &ctx.config;
    let sink = ctx.sink_config();
    let logging = loaded.config.logging();

    if ctx.json_output {
        let resolved = CdeventerConfig {
            sink: Some(sink),
            logging: Some(logging),
        };
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }

    println!("{}\n", style("# cdeventer Configuration").bold());

    let sources = loaded.loaded_from();
    if sources.is_empty() {
        println!("No config files loaded (using defaults)\n");
    } else {
        println!("Config files:");
        for source in &sources {
            println!("  {}", source.display());
        }
        println!();
    }

    println!("Sink:");
    println!("  url:  {}", style(&sink.url).cyan());
    if ctx.sink_url.is_some() {
        println!("        (from --sink / CDEVENTER_SINK_URL)");
    }
    println!("  mode: {}", style(sink.mode).cyan());
    if let Some(agent) = &sink.user_agent {
        println!("  user agent: {agent}");
    }
    println!();

    println!("Logging:");
    match &logging.level {
        Some(level) => println!("  level: {level}"),
        None => println!("  level: (default)"),
    }
    match &logging.dir {
        Some(dir) => println!("  dir:   {}", dir.display()),
        None => println!("  dir:   (console only)"),
    }
    println!();

    if !loaded.warnings.is_empty() {
        println!("Warnings:");
        for w in &loaded.warnings {
            println!("  ⚠ {w}");
        }
        println!();
    }

    if ctx.verbose {
        println!("---\nRaw config:\n");
        if let Ok(toml_str) = loaded.config.to_toml() {
            println!("{toml_str}");
        }
    }

    Ok(())
}

fn cmd_path(ctx: &Context) -> Result<()> {
    if ctx.json_output {
        let sources: Vec<_> = ctx
            .config
            .sources
            .iter()
            .map(|s| {
                serde_json::json!({ "layer": s.layer.as_str(), "path": s.path, "loaded": s.loaded })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&sources)?);
        return Ok(());
    }

    println!("Config file search order (later overrides earlier):\n");
    for source in &ctx.config.sources {
        let status = if source.loaded {
            style("✓ loaded").green()
        } else {
            style("· not found").dim()
        };
        println!("  {} {:<7} {}", status, source.layer, source.path.display());
    }
    Ok(())
}

fn cmd_init(ctx: &Context, local: bool, force: bool) -> Result<()> {
    let path = if local {
        PathBuf::from(PROJECT_CONFIG_FILE)
    } else {
        match cdeventer_config::user_config_path(ctx.config_dir.as_deref()) {
            Some(path) => path,
            None => bail!("could not determine the user config directory"),
        }
    };

    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let config = CdeventerConfig {
        sink: Some(SinkConfig::default()),
        logging: None,
    };
    cdeventer_config::save_config(&config, &path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
