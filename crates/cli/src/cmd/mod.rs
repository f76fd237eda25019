//! Command implementations.
//!
//! Both entry points plan the same step from the same configuration; `cmd_plan`
//! prints the plan and `cmd_release` executes it.

mod plan;
mod release;

use std::path::PathBuf;

use anyhow::{Context, Result};

use datacol_dist_lib::{ReleaseConfig, ReleaseManifest, Settings, Step};

use crate::output::OutputFormat;

pub use plan::cmd_plan;
pub use release::cmd_release;

/// Arguments shared by the release commands.
#[derive(Debug, Clone)]
pub struct ReleaseArgs {
  pub step: Step,
  /// Optional JSON release manifest.
  pub manifest: Option<PathBuf>,
  pub dist_dir: PathBuf,
  pub output: OutputFormat,
}

/// Build the release configuration from the environment and the optional manifest.
fn load_config(args: &ReleaseArgs) -> Result<ReleaseConfig> {
  let settings = Settings::from_env().context("Failed to read release settings from the environment")?;

  let manifest = match &args.manifest {
    Some(path) => ReleaseManifest::load(path)?,
    None => ReleaseManifest::default(),
  };

  ReleaseConfig::new(settings, manifest, &args.dist_dir).context("Invalid release configuration")
}
