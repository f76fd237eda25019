//! Implementation of a release run.
//!
//! Plans the requested step and executes it. Every action is echoed before it
//! runs; the first failing command stops the run.

use std::io::{self, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use datacol_dist_lib::{Environment, ExecutionSummary, Executor, Step, SystemRunner};

use super::{ReleaseArgs, load_config};
use crate::output::{print_banner, print_json, print_summary};

#[derive(Serialize)]
struct ReleaseReport<'a> {
  step: Step,
  version: &'a str,
  environment: Environment,
  bucket: &'a str,
  elapsed_ms: u128,
  #[serde(flatten)]
  summary: &'a ExecutionSummary,
}

/// Execute `args.step`.
///
/// In JSON mode the action echo goes to stderr so stdout carries only the report.
pub fn cmd_release(args: &ReleaseArgs) -> Result<()> {
  let start = Instant::now();
  let config = load_config(args)?;
  let json = args.output.is_json();

  if !json {
    print_banner(&config);
  }

  let actions = args.step.plan(&config);
  info!(
    step = %args.step,
    version = config.version(),
    environment = %config.environment(),
    actions = actions.len(),
    "starting release"
  );

  let echo: Box<dyn Write> = if json {
    Box::new(io::stderr())
  } else {
    Box::new(io::stdout())
  };
  let mut executor = Executor::with_echo(SystemRunner::new(), echo);
  let summary = executor
    .execute(&actions)
    .with_context(|| format!("Release step '{}' failed", args.step))?;

  let elapsed = start.elapsed();

  if json {
    return print_json(&ReleaseReport {
      step: args.step,
      version: config.version(),
      environment: config.environment(),
      bucket: config.bucket_prefix(),
      elapsed_ms: elapsed.as_millis(),
      summary: &summary,
    });
  }

  print_summary(args.step, &config, &summary, elapsed);

  Ok(())
}
