//! Release configuration.
//!
//! Everything a release run needs is gathered once at startup into an immutable
//! [`ReleaseConfig`]: the [`Settings`] read from the environment, the optional
//! [`ReleaseManifest`] describing what to build, and the local staging root.
//! Every step receives the same `&ReleaseConfig` and derives its paths from the
//! naming templates defined here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::platform::{Arch, Environment, Os, Target};

/// Environment variable holding the release version.
pub const VERSION_VAR: &str = "VERSION";

/// Environment variable holding the deployment environment tag.
pub const ENV_VAR: &str = "DATACOL_ENV";

/// Default local staging directory, relative to the working directory.
pub const DEFAULT_DIST_DIR: &str = "dist";

/// File name of the pointer recording the latest published version.
pub const LATEST_POINTER: &str = "latest.txt";

/// Parameters supplied by the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
  pub version: String,
  pub env_tag: String,
}

impl Settings {
  /// Read `VERSION` and `DATACOL_ENV`.
  ///
  /// Both are required; a variable that is unset or not valid unicode is
  /// reported as missing.
  pub fn from_env() -> Result<Self, ConfigError> {
    let version = std::env::var(VERSION_VAR).map_err(|_| ConfigError::MissingVar { name: VERSION_VAR })?;
    let env_tag = std::env::var(ENV_VAR).map_err(|_| ConfigError::MissingVar { name: ENV_VAR })?;
    Ok(Self { version, env_tag })
  }
}

/// Object store prefix and platform matrix for one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentProfile {
  pub bucket: String,
  pub matrix: Vec<Target>,
}

/// A distributable archive built from one target's CLI binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bundle {
  /// Archive name without extension (`osx` uploads as `osx.zip`).
  pub name: String,
  pub target: Target,
}

/// Describes what a release builds and where it goes.
///
/// Loaded from an optional JSON file. Missing fields take the defaults of the
/// canonical datacol release, so `{}` is a valid manifest. An environment
/// profile that is overridden must be given in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseManifest {
  /// Name stem of the cross-compiled CLI binaries.
  pub cli_name: String,
  /// Name the CLI binary takes inside bundle archives.
  pub canonical_name: String,
  pub api_name: String,
  /// Go sources passed to `go build` for the CLI.
  pub cli_sources: Vec<String>,
  /// Go sources passed to `go build` for the API binary.
  pub api_sources: Vec<String>,
  pub ldflags: String,
  /// Whether the full workflow builds and uploads the API binary.
  pub include_api: bool,
  pub api_target: Target,
  pub prod: EnvironmentProfile,
  pub dev: EnvironmentProfile,
  pub bundles: Vec<Bundle>,
}

impl Default for ReleaseManifest {
  fn default() -> Self {
    let cli_sources = [
      "main", "build", "stack", "apps", "deploy", "kubectl", "env", "logs", "helper", "run", "infra", "upgrade",
      "login",
    ]
    .iter()
    .map(|name| format!("cmd/{}.go", name))
    .collect();

    Self {
      cli_name: "datacol".to_string(),
      canonical_name: "datacol".to_string(),
      api_name: "apictl".to_string(),
      cli_sources,
      api_sources: vec!["./api".to_string()],
      ldflags: "-s -w".to_string(),
      include_api: true,
      api_target: Target::new(Os::Linux, Arch::Amd64),
      prod: EnvironmentProfile {
        bucket: "gs://datacol-distros".to_string(),
        matrix: Environment::Prod.default_matrix(),
      },
      dev: EnvironmentProfile {
        bucket: "gs://datacol-dev".to_string(),
        matrix: Environment::Dev.default_matrix(),
      },
      bundles: vec![
        Bundle {
          name: "osx".to_string(),
          target: Target::new(Os::Darwin, Arch::Amd64),
        },
        Bundle {
          name: "linux".to_string(),
          target: Target::new(Os::Linux, Arch::Amd64),
        },
      ],
    }
  }
}

impl ReleaseManifest {
  /// Load a manifest from a JSON file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadManifest {
      path: path.to_path_buf(),
      source,
    })?;
    let manifest = serde_json::from_str(&content).map_err(|source| ConfigError::ParseManifest {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), "loaded release manifest");
    Ok(manifest)
  }

  pub fn profile(&self, environment: Environment) -> &EnvironmentProfile {
    match environment {
      Environment::Prod => &self.prod,
      Environment::Dev => &self.dev,
    }
  }
}

/// Immutable configuration for a single release run.
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
  version: String,
  env_tag: String,
  environment: Environment,
  bucket_prefix: String,
  matrix: Vec<Target>,
  manifest: ReleaseManifest,
  dist_dir: PathBuf,
}

impl ReleaseConfig {
  /// Assemble and validate the configuration.
  ///
  /// # Errors
  ///
  /// Returns an error if the version cannot be used as a path component or the
  /// selected environment has an empty matrix.
  pub fn new(settings: Settings, manifest: ReleaseManifest, dist_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
    validate_version(&settings.version)?;

    let environment = Environment::from_tag(&settings.env_tag);
    let profile = manifest.profile(environment);
    if profile.matrix.is_empty() {
      return Err(ConfigError::EmptyMatrix {
        environment: environment.to_string(),
      });
    }

    Ok(Self {
      version: settings.version,
      env_tag: settings.env_tag,
      environment,
      bucket_prefix: profile.bucket.trim_end_matches('/').to_string(),
      matrix: profile.matrix.clone(),
      dist_dir: dist_dir.into(),
      manifest,
    })
  }

  pub fn version(&self) -> &str {
    &self.version
  }

  /// The tag exactly as given in the environment.
  pub fn env_tag(&self) -> &str {
    &self.env_tag
  }

  pub fn environment(&self) -> Environment {
    self.environment
  }

  pub fn bucket_prefix(&self) -> &str {
    &self.bucket_prefix
  }

  pub fn matrix(&self) -> &[Target] {
    &self.matrix
  }

  pub fn manifest(&self) -> &ReleaseManifest {
    &self.manifest
  }

  /// `<dist>/<version>`
  pub fn version_dir(&self) -> PathBuf {
    self.dist_dir.join(&self.version)
  }

  /// Local path of the CLI binary for `target`.
  pub fn binary_path(&self, target: &Target) -> PathBuf {
    self.version_dir().join(target.binary_name(&self.manifest.cli_name))
  }

  pub fn api_binary_path(&self) -> PathBuf {
    self.version_dir().join(&self.manifest.api_name)
  }

  pub fn api_archive_path(&self) -> PathBuf {
    self.version_dir().join(format!("{}.zip", self.manifest.api_name))
  }

  /// Local copy of the CLI binary under its canonical name.
  pub fn canonical_path(&self) -> PathBuf {
    self.version_dir().join(&self.manifest.canonical_name)
  }

  pub fn bundle_path(&self, bundle: &Bundle) -> PathBuf {
    self.version_dir().join(format!("{}.zip", bundle.name))
  }

  /// `<dist>/latest.txt`
  pub fn latest_path(&self) -> PathBuf {
    self.dist_dir.join(LATEST_POINTER)
  }

  /// `<prefix>/binaries`
  pub fn binaries_remote(&self) -> String {
    format!("{}/binaries", self.bucket_prefix)
  }

  /// `<prefix>/binaries/<version>`
  pub fn version_remote(&self) -> String {
    format!("{}/{}", self.binaries_remote(), self.version)
  }

  /// `<prefix>/binaries/<version>/<api>.zip`
  pub fn api_archive_remote(&self) -> String {
    format!("{}/{}.zip", self.version_remote(), self.manifest.api_name)
  }

  /// `<prefix>/<bundle>.zip`
  pub fn bundle_remote(&self, bundle: &Bundle) -> String {
    format!("{}/{}.zip", self.bucket_prefix, bundle.name)
  }

  /// `<prefix>/binaries/latest.txt`
  pub fn latest_remote(&self) -> String {
    format!("{}/{}", self.binaries_remote(), LATEST_POINTER)
  }

  /// Contents written to the pointer file.
  pub fn latest_contents(&self) -> String {
    format!("{}\n", self.version)
  }
}

fn validate_version(version: &str) -> Result<(), ConfigError> {
  let reason = if version.is_empty() {
    "must not be empty"
  } else if version.chars().any(char::is_whitespace) {
    "must not contain whitespace"
  } else if version.contains('/') || version.contains('\\') {
    "must not contain path separators"
  } else if version == "." || version == ".." {
    "must not be a relative path component"
  } else {
    return Ok(());
  };

  Err(ConfigError::InvalidVersion {
    version: version.to_string(),
    reason,
  })
}
