//! External process abstraction.
//!
//! Every toolchain and object-store operation is expressed as a [`CommandLine`]
//! and handed to a [`Runner`]. The runner reports a non-zero exit as
//! [`ReleaseError::CommandFailed`] carrying the exit status, which is what the
//! executor uses to stop the release.
//!
//! Child stderr is inherited so compiler diagnostics and gsutil progress show
//! up live. Stdout is captured and logged at debug level.

use std::fmt;
use std::process::{Command, Stdio};

use serde::Serialize;
use tracing::debug;

use crate::error::ReleaseError;

/// A program invocation with its arguments and extra environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandLine {
  pub program: String,
  pub args: Vec<String>,
  /// Variables set on top of the inherited environment, in declaration order.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub env: Vec<(String, String)>,
}

impl CommandLine {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      env: Vec::new(),
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.env.push((key.into(), value.into()));
    self
  }

  /// Value following `flag` in the argument list, if any.
  pub fn flag_value(&self, flag: &str) -> Option<&str> {
    self
      .args
      .iter()
      .position(|arg| arg == flag)
      .and_then(|i| self.args.get(i + 1))
      .map(String::as_str)
  }
}

/// Renders the invocation the way it would be typed into a POSIX shell.
impl fmt::Display for CommandLine {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (key, value) in &self.env {
      write!(f, "{}={} ", key, shell_quote(value))?;
    }
    write!(f, "{}", shell_quote(&self.program))?;
    for arg in &self.args {
      write!(f, " {}", shell_quote(arg))?;
    }
    Ok(())
  }
}

/// Quote `word` for display if a shell would split or expand it.
pub fn shell_quote(word: &str) -> String {
  let is_plain = |c: char| c.is_ascii_alphanumeric() || "-_./=:@,+%".contains(c);
  if !word.is_empty() && word.chars().all(is_plain) {
    word.to_string()
  } else {
    format!("'{}'", word.replace('\'', r"'\''"))
  }
}

/// Runs external commands.
pub trait Runner {
  /// Run `command` to completion.
  ///
  /// # Errors
  ///
  /// Returns [`ReleaseError::CommandFailed`] when the command exits
  /// unsuccessfully and [`ReleaseError::Spawn`] when it cannot be started.
  fn run(&mut self, command: &CommandLine) -> Result<(), ReleaseError>;
}

/// Runs commands as child processes, one at a time, blocking until each exits.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
  pub fn new() -> Self {
    Self
  }
}

impl Runner for SystemRunner {
  fn run(&mut self, command: &CommandLine) -> Result<(), ReleaseError> {
    let mut child = Command::new(&command.program);
    child
      .args(&command.args)
      .envs(command.env.iter().map(|(key, value)| (key, value)))
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::inherit());

    debug!(program = %command.program, "spawning process");

    let output = child.output().map_err(|source| ReleaseError::Spawn {
      command: command.to_string(),
      source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
      debug!(stdout = %stdout.trim(), "command stdout");
    }

    if !output.status.success() {
      return Err(ReleaseError::CommandFailed {
        command: command.to_string(),
        code: output.status.code(),
      });
    }

    Ok(())
  }
}
