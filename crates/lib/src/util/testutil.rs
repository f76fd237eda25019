//! Test utilities for datacol-dist-lib.
//!
//! [`RecordingRunner`] stands in for the Go toolchain and `gsutil` so release
//! plans can be executed against a temporary directory.

use std::path::Path;

use crate::error::ReleaseError;
use crate::execute::process::{CommandLine, Runner};
use crate::toolchain::GO;

/// A [`Runner`] that records every command instead of spawning it.
///
/// `go build -o <path>` is simulated by writing `built for <GOOS> <GOARCH>` to
/// `<path>`. Every other command succeeds without side effects unless it
/// matches the configured failure.
#[derive(Debug, Default)]
pub struct RecordingRunner {
  commands: Vec<String>,
  fail: Option<(String, i32)>,
}

impl RecordingRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Fail the first command whose rendered line contains `pattern`, exiting with `code`.
  pub fn fail_on(mut self, pattern: &str, code: i32) -> Self {
    self.fail = Some((pattern.to_string(), code));
    self
  }

  /// Rendered command lines, in the order they were run.
  pub fn commands(&self) -> &[String] {
    &self.commands
  }
}

impl Runner for RecordingRunner {
  fn run(&mut self, command: &CommandLine) -> Result<(), ReleaseError> {
    let line = command.to_string();
    self.commands.push(line.clone());

    if let Some((pattern, code)) = &self.fail
      && line.contains(pattern.as_str())
    {
      return Err(ReleaseError::CommandFailed {
        command: line,
        code: Some(*code),
      });
    }

    if command.program == GO
      && let Some(output) = command.flag_value("-o")
    {
      let env = |key: &str| {
        command
          .env
          .iter()
          .find(|(k, _)| k == key)
          .map(|(_, v)| v.as_str())
          .unwrap_or("")
      };
      let output = Path::new(output);
      if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent).unwrap();
      }
      std::fs::write(output, format!("built for {} {}\n", env("GOOS"), env("GOARCH"))).unwrap();
    }

    Ok(())
  }
}
