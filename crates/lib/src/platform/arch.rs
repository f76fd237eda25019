use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// CPU architectures a release can target, using `GOARCH` names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Arch {
  I386,
  Amd64,
  Arm,
  Arm64,
}

impl Arch {
  /// Returns the `GOARCH` identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::I386 => "386",
      Self::Amd64 => "amd64",
      Self::Arm => "arm",
      Self::Arm64 => "arm64",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Arch {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "386" => Ok(Self::I386),
      "amd64" => Ok(Self::Amd64),
      "arm" => Ok(Self::Arm),
      "arm64" => Ok(Self::Arm64),
      other => Err(ConfigError::UnknownArch(other.to_string())),
    }
  }
}
