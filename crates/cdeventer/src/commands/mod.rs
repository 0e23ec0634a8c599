//! CLI command handlers.

pub mod config;
pub mod reconcile;
pub mod render;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use serde::Deserialize;

use cdeventer_client::HttpSink;
use cdeventer_config::{LoadedConfig, SinkConfig};
use cdeventer_reconciler::Reconciler;
use cdeventer_types::Run;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Merged configuration and the files it came from.
    pub config: LoadedConfig,
    /// Sink URL from `--sink` / `CDEVENTER_SINK_URL`.
    pub sink_url: Option<String>,
    /// User config directory from `--config-dir`.
    pub config_dir: Option<PathBuf>,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// The effective sink settings: config file values with the CLI override applied.
    pub fn sink_config(&self) -> SinkConfig {
        let mut sink = self.config.config.sink();
        if let Some(url) = &self.sink_url {
            sink.url = url.clone();
        }
        sink
    }

    /// Build a reconciler delivering over HTTP to the effective sink.
    pub fn reconciler(&self) -> Result<Reconciler> {
        let sink = self.sink_config();
        let target = sink.target()?;

        let mut builder = HttpSink::builder();
        if let Some(agent) = &sink.user_agent {
            builder = builder.user_agent(agent);
        }
        let http = builder.build().context("failed to build HTTP sink")?;

        Ok(Reconciler::builder(target)
            .sink(Arc::new(http))
            .content_mode(sink.mode)
            .build())
    }
}

/// Read every Run in a manifest file (`-` for stdin).
///
/// Accepts JSON or YAML, including multi-document YAML streams.
pub fn read_runs(path: &Path) -> Result<Vec<Run>> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };

    let mut runs = Vec::new();
    for document in serde_yaml::Deserializer::from_str(&contents) {
        let value = serde_yaml::Value::deserialize(document)
            .with_context(|| format!("invalid manifest {}", path.display()))?;
        if value.is_null() {
            continue;
        }
        let run: Run = serde_yaml::from_value(value)
            .with_context(|| format!("invalid Run in {}", path.display()))?;
        runs.push(run);
    }
    Ok(runs)
}

/// Print Runs as YAML documents, or as a JSON array.
pub fn print_runs(runs: &[Run], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(runs)?);
    } else {
        for run in runs {
            print!("---\n{}", serde_yaml::to_string(run)?);
        }
    }
    Ok(())
}
