//! Error types for configuring and running a release.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while assembling the release configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// A required environment variable is not set.
  #[error("environment variable {name} is not set")]
  MissingVar { name: &'static str },

  /// The version string cannot be used as a path component.
  #[error("invalid version '{version}': {reason}")]
  InvalidVersion { version: String, reason: &'static str },

  #[error("unknown operating system '{0}'")]
  UnknownOs(String),

  #[error("unknown architecture '{0}'")]
  UnknownArch(String),

  /// A target was not written as `<os>-<arch>`.
  #[error("invalid target '{0}', expected <os>-<arch>")]
  InvalidTarget(String),

  /// The selected environment has no targets to build.
  #[error("platform matrix for '{environment}' is empty")]
  EmptyMatrix { environment: String },

  #[error("failed to read release manifest {}: {source}", path.display())]
  ReadManifest {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse release manifest {}: {source}", path.display())]
  ParseManifest {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

/// Errors that abort a release run.
#[derive(Debug, Error)]
pub enum ReleaseError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  /// An external command exited unsuccessfully.
  ///
  /// `code` is `None` when the process was terminated by a signal.
  #[error("command failed ({}): {command}", describe_exit(*code))]
  CommandFailed { command: String, code: Option<i32> },

  /// An external command could not be started at all.
  #[error("failed to spawn {command}: {source}")]
  Spawn {
    command: String,
    #[source]
    source: std::io::Error,
  },

  #[error("io error at {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// Echoing an action to the output stream failed.
  #[error("failed to echo action: {0}")]
  Echo(#[source] std::io::Error),

  #[error("failed to write archive {}: {source}", path.display())]
  Archive {
    path: PathBuf,
    #[source]
    source: zip::result::ZipError,
  },
}

fn describe_exit(code: Option<i32>) -> String {
  match code {
    Some(code) => format!("exit code {}", code),
    None => "terminated by signal".to_string(),
  }
}

impl ReleaseError {
  pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }

  /// Process exit code to report for this error.
  ///
  /// A failed command surfaces its own exit status; everything else, including
  /// a command killed by a signal, exits with 1.
  pub fn exit_code(&self) -> i32 {
    match self {
      Self::CommandFailed { code: Some(code), .. } if *code != 0 => *code,
      _ => 1,
    }
  }
}
