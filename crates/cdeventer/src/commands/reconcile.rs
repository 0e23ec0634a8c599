//! Reconcile command - deliver the CDEvents described by Run manifests.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use console::style;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use cdeventer_reconciler::reconcile_all;
use cdeventer_types::{ConditionStatus, Run};

use super::{Context, print_runs, read_runs};

/// Arguments for the reconcile command.
#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// Run manifests (YAML or JSON), `-` for stdin
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Run the reconcile command.
pub async fn run(args: ReconcileArgs, ctx: &Context) -> Result<()> {
    let mut runs = Vec::new();
    for file in &args.files {
        runs.extend(read_runs(file)?);
    }
    let reconciler = ctx.reconciler()?;

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling in-flight sends");
            interrupt.cancel();
        }
    });

    let results = reconcile_all(&reconciler, runs, &cancel).await;
    let failed = results.iter().filter(|(_, result)| result.is_err()).count();
    let runs: Vec<Run> = results.into_iter().map(|(run, _)| run).collect();

    if !ctx.json_output {
        for run in &runs {
            eprintln!("{}", summary_line(run));
        }
    }
    print_runs(&runs, ctx.json_output)?;

    if failed > 0 {
        bail!("{} of {} Runs failed", failed, runs.len());
    }
    Ok(())
}

fn summary_line(run: &Run) -> String {
    match run.succeeded_condition() {
        Some(c) if c.status == ConditionStatus::True => {
            format!("{} {} {}", style("✓").green(), run.key(), c.reason)
        }
        Some(c) => format!(
            "{} {} {}: {}",
            style("✗").red(),
            run.key(),
            style(&c.reason).bold(),
            c.message
        ),
        None => format!("{} {} skipped", style("·").dim(), run.key()),
    }
}
