//! Terminal output for release runs.
//!
//! Text mode prints the environment banner, the planned or executed actions and
//! a closing summary. JSON mode prints a single report on stdout.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use datacol_dist_lib::execute::ExecutionSummary;
use datacol_dist_lib::{ReleaseAction, ReleaseConfig, Step};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

const DONE: &str = "✓";
const FAILED: &str = "✗";
const IDLE: &str = "⚠";
const PLANNED: &str = "→";

/// `ENV:<tag> bucket:<prefix>/<version>`, printed before anything runs.
pub fn banner(config: &ReleaseConfig) -> String {
  format!(
    "ENV:{} bucket:{}/{}",
    config.env_tag(),
    config.bucket_prefix(),
    config.version()
  )
}

pub fn print_banner(config: &ReleaseConfig) {
  println!("{}", banner(config).if_supports_color(Stream::Stdout, |s| s.bold()));
}

/// Dry-run listing: a header followed by one line per action.
pub fn plan_lines(step: Step, actions: &[ReleaseAction]) -> Vec<String> {
  let mut lines = Vec::with_capacity(actions.len() + 1);
  lines.push(format!(
    "Dry run - step '{}' would perform {} action(s)",
    step,
    actions.len()
  ));
  lines.extend(actions.iter().map(|action| format!("  {} {}", PLANNED, action)));
  lines
}

/// Print the dry-run listing, or a notice on stderr when the step is empty.
pub fn print_plan(step: Step, actions: &[ReleaseAction]) {
  if actions.is_empty() {
    let notice = format!("Step '{}' has nothing to do", step);
    eprintln!(
      "{} {}",
      IDLE.if_supports_color(Stream::Stderr, |s| s.yellow()),
      notice.if_supports_color(Stream::Stderr, |s| s.yellow())
    );
    return;
  }
  for line in plan_lines(step, actions) {
    println!("{}", line);
  }
}

/// Seconds with one decimal place.
pub fn format_elapsed(elapsed: Duration) -> String {
  format!("{:.1}s", elapsed.as_secs_f64())
}

fn archive_label(path: &Path) -> String {
  path
    .file_name()
    .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

/// Label/value pairs describing a finished run.
///
/// Archives are listed by file name with their size. Steps that move the
/// latest pointer also report where it now lives.
pub fn summary_stats(step: Step, config: &ReleaseConfig, summary: &ExecutionSummary) -> Vec<(String, String)> {
  let mut stats = vec![
    ("Environment".to_string(), config.env_tag().to_string()),
    ("Actions".to_string(), summary.actions.to_string()),
    ("Commands".to_string(), summary.commands.to_string()),
  ];
  for archive in &summary.archives {
    stats.push((archive_label(&archive.path), format!("{} bytes", archive.size)));
  }
  if matches!(step, Step::All | Step::Publish) {
    stats.push((
      "Latest".to_string(),
      format!("{} -> {}", config.version(), config.latest_remote()),
    ));
  }
  stats
}

pub fn print_summary(step: Step, config: &ReleaseConfig, summary: &ExecutionSummary, elapsed: Duration) {
  println!();
  println!(
    "{} Step '{}' for {} complete in {}",
    DONE.if_supports_color(Stream::Stdout, |s| s.green()),
    step,
    config.version(),
    format_elapsed(elapsed)
  );
  for (label, value) in summary_stats(step, config, summary) {
    println!("  {}: {}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()), value);
  }
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    FAILED.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize report to JSON")?;
  println!("{}", json);
  Ok(())
}
