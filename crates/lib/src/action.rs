//! Release actions.
//!
//! A release step is planned as an ordered list of [`ReleaseAction`]s before
//! anything runs. Local filesystem work is carried out by the executor directly;
//! toolchain and object-store work is an [`Exec`](ReleaseAction::Exec) of an
//! external command.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::execute::process::{CommandLine, shell_quote};

/// A primitive operation performed during a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReleaseAction {
  /// Remove a directory with all its contents and recreate it empty.
  ResetDir { path: PathBuf },
  /// Create a directory and its parents if missing.
  CreateDir { path: PathBuf },
  /// Run an external command.
  Exec(CommandLine),
  CopyFile { from: PathBuf, to: PathBuf },
  /// Zip `source` into `dest` as a single entry named `entry`.
  Archive { source: PathBuf, entry: String, dest: PathBuf },
  WriteFile { path: PathBuf, contents: String },
}

impl ReleaseAction {
  /// Short name used in logs.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::ResetDir { .. } => "reset_dir",
      Self::CreateDir { .. } => "create_dir",
      Self::Exec(_) => "exec",
      Self::CopyFile { .. } => "copy_file",
      Self::Archive { .. } => "archive",
      Self::WriteFile { .. } => "write_file",
    }
  }

  /// The external command, for `Exec` actions.
  pub fn command(&self) -> Option<&CommandLine> {
    match self {
      Self::Exec(command) => Some(command),
      _ => None,
    }
  }
}

/// Renders the action as the equivalent shell command line.
impl fmt::Display for ReleaseAction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let quote = |path: &PathBuf| shell_quote(&path.to_string_lossy());

    match self {
      Self::ResetDir { path } => write!(f, "rm -rf {0} && mkdir -p {0}", quote(path)),
      Self::CreateDir { path } => write!(f, "mkdir -p {}", quote(path)),
      Self::Exec(command) => write!(f, "{}", command),
      Self::CopyFile { from, to } => write!(f, "cp {} {}", quote(from), quote(to)),
      Self::Archive { source, entry, dest } => {
        write!(f, "zip {} {}", quote(dest), quote(source))?;
        let source_name = source.file_name().map(|n| n.to_string_lossy());
        if source_name.as_deref() != Some(entry.as_str()) {
          write!(f, " (as {})", shell_quote(entry))?;
        }
        Ok(())
      }
      Self::WriteFile { path, contents } => {
        write!(f, "echo {} > {}", shell_quote(contents.trim_end()), quote(path))
      }
    }
  }
}
