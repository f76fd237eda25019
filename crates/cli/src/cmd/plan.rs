//! Dry-run output: show what a step would do without doing it.

use anyhow::Result;
use serde::Serialize;

use datacol_dist_lib::{Environment, ReleaseAction, Step, Target};

use super::{ReleaseArgs, load_config};
use crate::output::{print_banner, print_json, print_plan};

#[derive(Serialize)]
struct PlanReport<'a> {
  step: Step,
  version: &'a str,
  environment: Environment,
  env_tag: &'a str,
  bucket: &'a str,
  matrix: &'a [Target],
  actions: &'a [ReleaseAction],
}

/// Print the actions `args.step` would perform.
pub fn cmd_plan(args: &ReleaseArgs) -> Result<()> {
  let config = load_config(args)?;
  let actions = args.step.plan(&config);

  if args.output.is_json() {
    return print_json(&PlanReport {
      step: args.step,
      version: config.version(),
      environment: config.environment(),
      env_tag: config.env_tag(),
      bucket: config.bucket_prefix(),
      matrix: config.matrix(),
      actions: &actions,
    });
  }

  print_banner(&config);
  print_plan(args.step, &actions);

  Ok(())
}
