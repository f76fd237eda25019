use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Operating systems a release can target, named the way the Go toolchain names them (`GOOS`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Os {
  Darwin,
  Linux,
  Windows,
}

impl Os {
  /// Returns the lowercase `GOOS` identifier for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Darwin => "darwin",
      Self::Linux => "linux",
      Self::Windows => "windows",
    }
  }

  /// Suffix appended to executables built for this OS.
  ///
  /// Only Windows requires one.
  pub fn exe_suffix(&self) -> &'static str {
    match self {
      Self::Windows => ".exe",
      Self::Darwin | Self::Linux => "",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Os {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "darwin" => Ok(Self::Darwin),
      "linux" => Ok(Self::Linux),
      "windows" => Ok(Self::Windows),
      other => Err(ConfigError::UnknownOs(other.to_string())),
    }
  }
}
