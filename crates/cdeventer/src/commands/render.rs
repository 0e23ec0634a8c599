//! Render command - show the CloudEvent a Run would produce.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;

use cdeventer_events::{CloudEvent, HttpMessage};
use cdeventer_reconciler::encode_run;
use cdeventer_types::ContentMode;

use super::{Context, read_runs};

/// Arguments for the render command.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Run manifest (YAML or JSON), `-` for stdin
    pub file: PathBuf,

    /// Content mode to render (default: [sink] mode)
    #[arg(long)]
    pub mode: Option<ContentMode>,
}

/// Run the render command.
///
/// Prints the HTTP message a sink would receive: headers, then the body.
/// With `--json` the decoded CloudEvent is printed instead. Nothing is sent
/// and the Run status is not touched.
pub async fn run(args: RenderArgs, ctx: &Context) -> Result<()> {
    let mode = args.mode.unwrap_or_else(|| ctx.sink_config().mode);

    for run in read_runs(&args.file)? {
        let message = encode_run(&run, mode).with_context(|| format!("Run {}", run.key()))?;
        if ctx.json_output {
            let cloud_event = CloudEvent::from_http(&message)?;
            println!("{}", serde_json::to_string_pretty(&cloud_event)?);
        } else {
            print_message(&message)?;
        }
    }
    Ok(())
}

fn print_message(message: &HttpMessage) -> Result<()> {
    for (name, value) in &message.headers {
        println!("{name}: {value}");
    }
    println!();
    let body: serde_json::Value = serde_json::from_slice(&message.body)?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
