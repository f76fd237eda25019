//! Release execution.
//!
//! The [`Executor`] carries out a planned list of [`ReleaseAction`]s strictly in
//! order. Each action is echoed as its shell equivalent before it runs, and the
//! first failure ends the run: nothing after it starts, nothing before it is
//! undone.

pub mod archive;
pub mod process;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info};

use crate::action::ReleaseAction;
use crate::error::ReleaseError;

pub use archive::write_archive;
pub use process::{CommandLine, Runner, SystemRunner};

/// An archive produced during the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveRecord {
  pub path: PathBuf,
  pub size: u64,
}

/// What a completed run did.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionSummary {
  /// Number of actions carried out.
  pub actions: usize,
  /// Number of external commands run.
  pub commands: usize,
  pub archives: Vec<ArchiveRecord>,
}

/// Runs release actions one after another.
pub struct Executor<R, W> {
  runner: R,
  echo: W,
}

impl<R: Runner, W: Write> Executor<R, W> {
  pub fn with_echo(runner: R, echo: W) -> Self {
    Self { runner, echo }
  }

  /// Execute `actions` in order, stopping at the first failure.
  ///
  /// # Errors
  ///
  /// Returns the error of the first action that failed. A failed external
  /// command is reported as [`ReleaseError::CommandFailed`] with its exit code.
  pub fn execute(&mut self, actions: &[ReleaseAction]) -> Result<ExecutionSummary, ReleaseError> {
    let mut summary = ExecutionSummary::default();

    for (index, action) in actions.iter().enumerate() {
      writeln!(self.echo, "{}", action).map_err(ReleaseError::Echo)?;
      self.echo.flush().map_err(ReleaseError::Echo)?;
      info!(index, kind = action.kind(), "running release action");

      if let Err(e) = self.apply(action, &mut summary) {
        error!(index, kind = action.kind(), error = %e, "release action failed, stopping");
        return Err(e);
      }
      summary.actions += 1;
    }

    info!(
      actions = summary.actions,
      commands = summary.commands,
      archives = summary.archives.len(),
      "release actions complete"
    );
    Ok(summary)
  }

  pub fn into_runner(self) -> R {
    self.runner
  }

  fn apply(&mut self, action: &ReleaseAction, summary: &mut ExecutionSummary) -> Result<(), ReleaseError> {
    match action {
      ReleaseAction::ResetDir { path } => reset_dir(path),
      ReleaseAction::CreateDir { path } => std::fs::create_dir_all(path).map_err(|e| ReleaseError::io(path, e)),
      ReleaseAction::Exec(command) => {
        self.runner.run(command)?;
        summary.commands += 1;
        Ok(())
      }
      ReleaseAction::CopyFile { from, to } => std::fs::copy(from, to)
        .map(|_| ())
        .map_err(|e| ReleaseError::io(from, e)),
      ReleaseAction::Archive { source, entry, dest } => {
        let size = write_archive(source, entry, dest)?;
        summary.archives.push(ArchiveRecord {
          path: dest.clone(),
          size,
        });
        Ok(())
      }
      ReleaseAction::WriteFile { path, contents } => {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
          std::fs::create_dir_all(parent).map_err(|e| ReleaseError::io(parent, e))?;
        }
        std::fs::write(path, contents).map_err(|e| ReleaseError::io(path, e))
      }
    }
  }
}

fn reset_dir(path: &Path) -> Result<(), ReleaseError> {
  match std::fs::remove_dir_all(path) {
    Ok(()) => {}
    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
    Err(e) => return Err(ReleaseError::io(path, e)),
  }
  std::fs::create_dir_all(path).map_err(|e| ReleaseError::io(path, e))
}
