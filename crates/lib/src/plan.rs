//! Release steps.
//!
//! Each [`Step`] is planned from the release configuration into the ordered
//! list of actions it performs. Planning is pure: nothing touches the
//! filesystem or spawns a process until the plan is handed to the executor.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::action::ReleaseAction;
use crate::config::ReleaseConfig;
use crate::toolchain;

/// A named unit of the release workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
  /// Clean, build everything, archive and publish.
  All,
  /// Regenerate the local version directory from scratch.
  Clean,
  /// Build, archive and upload the API binary.
  Api,
  /// Cross-compile the CLI for every target in the matrix.
  Build,
  /// Package and upload the per-platform bundles.
  Archive,
  /// Upload the version directory and move the latest pointer.
  Publish,
}

impl Step {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::All => "all",
      Self::Clean => "clean",
      Self::Api => "api",
      Self::Build => "build",
      Self::Archive => "archive",
      Self::Publish => "publish",
    }
  }

  /// Plan the actions this step performs for `config`.
  pub fn plan(self, config: &ReleaseConfig) -> Vec<ReleaseAction> {
    match self {
      Self::All => plan_all(config),
      Self::Clean => plan_clean(config),
      Self::Api => plan_api(config),
      Self::Build => plan_build(config),
      Self::Archive => plan_archive(config),
      Self::Publish => plan_publish(config),
    }
  }
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

fn plan_all(config: &ReleaseConfig) -> Vec<ReleaseAction> {
  let mut steps = vec![Step::Clean];
  if config.manifest().include_api {
    steps.push(Step::Api);
  }
  steps.extend([Step::Build, Step::Archive, Step::Publish]);

  steps.into_iter().flat_map(|step| step.plan(config)).collect()
}

fn plan_clean(config: &ReleaseConfig) -> Vec<ReleaseAction> {
  vec![ReleaseAction::ResetDir {
    path: config.version_dir(),
  }]
}

fn plan_api(config: &ReleaseConfig) -> Vec<ReleaseAction> {
  let manifest = config.manifest();
  let binary = config.api_binary_path();
  let archive = config.api_archive_path();
  let remote = config.api_archive_remote();

  vec![
    ReleaseAction::CreateDir {
      path: config.version_dir(),
    },
    ReleaseAction::Exec(toolchain::go_build(
      &manifest.api_target,
      &manifest.ldflags,
      &binary,
      &manifest.api_sources,
    )),
    ReleaseAction::Archive {
      source: binary,
      entry: manifest.api_name.clone(),
      dest: archive.clone(),
    },
    ReleaseAction::Exec(toolchain::upload(&archive, &remote)),
    ReleaseAction::Exec(toolchain::grant_public_read(&remote)),
  ]
}

fn plan_build(config: &ReleaseConfig) -> Vec<ReleaseAction> {
  let manifest = config.manifest();
  let mut actions = vec![ReleaseAction::CreateDir {
    path: config.version_dir(),
  }];

  for target in config.matrix() {
    actions.push(ReleaseAction::Exec(toolchain::go_build(
      target,
      &manifest.ldflags,
      &config.binary_path(target),
      &manifest.cli_sources,
    )));
  }

  actions
}

fn plan_archive(config: &ReleaseConfig) -> Vec<ReleaseAction> {
  let manifest = config.manifest();
  let canonical = config.canonical_path();
  let mut actions = Vec::new();

  for bundle in &manifest.bundles {
    if !config.matrix().contains(&bundle.target) {
      warn!(
        bundle = %bundle.name,
        target = %bundle.target,
        environment = %config.environment(),
        "bundle target is not in the platform matrix, skipping"
      );
      continue;
    }

    let archive = config.bundle_path(bundle);
    let remote = config.bundle_remote(bundle);

    actions.extend([
      ReleaseAction::CopyFile {
        from: config.binary_path(&bundle.target),
        to: canonical.clone(),
      },
      ReleaseAction::Archive {
        source: canonical.clone(),
        entry: manifest.canonical_name.clone(),
        dest: archive.clone(),
      },
      ReleaseAction::Exec(toolchain::upload(&archive, &remote)),
      ReleaseAction::Exec(toolchain::grant_public_read(&remote)),
    ]);
  }

  actions
}

fn plan_publish(config: &ReleaseConfig) -> Vec<ReleaseAction> {
  let binaries = config.binaries_remote();
  let latest = config.latest_path();

  vec![
    ReleaseAction::Exec(toolchain::upload_dir(&config.version_dir(), &binaries)),
    ReleaseAction::WriteFile {
      path: latest.clone(),
      contents: config.latest_contents(),
    },
    ReleaseAction::Exec(toolchain::upload(&latest, &config.latest_remote())),
    ReleaseAction::Exec(toolchain::grant_public_read_recursive(&binaries)),
  ]
}
