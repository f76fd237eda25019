//! Build targets and the per-environment platform matrix.
//!
//! A [`Target`] is one (OS, architecture) pair. The matrix is the ordered list of
//! targets a release is cross-compiled for; which matrix applies depends on the
//! deployment [`Environment`].

pub mod arch;
pub mod os;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub use arch::Arch;
pub use os::Os;

/// Target identifier combining OS and architecture (e.g., "linux-amd64")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Target {
  pub os: Os,
  pub arch: Arch,
}

impl Target {
  pub const fn new(os: Os, arch: Arch) -> Self {
    Self { os, arch }
  }

  /// Returns the target pair string (e.g., "darwin-amd64")
  pub fn pair(&self) -> String {
    format!("{}-{}", self.os, self.arch)
  }

  /// Name of the binary `tool` compiled for this target.
  ///
  /// `<tool>-<os>-<arch>`, with the OS executable suffix appended.
  pub fn binary_name(&self, tool: &str) -> String {
    format!("{}-{}{}", tool, self.pair(), self.os.exe_suffix())
  }
}

impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.pair())
  }
}

impl FromStr for Target {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (os, arch) = s
      .split_once('-')
      .ok_or_else(|| ConfigError::InvalidTarget(s.to_string()))?;
    Ok(Self::new(os.parse()?, arch.parse()?))
  }
}

impl TryFrom<String> for Target {
  type Error = ConfigError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<Target> for String {
  fn from(target: Target) -> Self {
    target.pair()
  }
}

/// Deployment environment selected by the environment tag.
///
/// `prod` selects the full matrix and the public distribution bucket; every
/// other tag is treated as a development release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
  Prod,
  Dev,
}

impl Environment {
  pub fn from_tag(tag: &str) -> Self {
    if tag == "prod" { Self::Prod } else { Self::Dev }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Prod => "prod",
      Self::Dev => "dev",
    }
  }

  /// The built-in matrix for this environment, in build order
  pub fn default_matrix(&self) -> Vec<Target> {
    use Arch::*;
    use Os::*;

    match self {
      Self::Prod => vec![
        Target::new(Darwin, I386),
        Target::new(Darwin, Amd64),
        Target::new(Linux, Arm),
        Target::new(Linux, I386),
        Target::new(Linux, Amd64),
        Target::new(Windows, I386),
        Target::new(Windows, Amd64),
      ],
      Self::Dev => vec![Target::new(Darwin, Amd64), Target::new(Linux, Amd64)],
    }
  }
}

impl fmt::Display for Environment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
