mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use datacol_dist_lib::config::DEFAULT_DIST_DIR;
use datacol_dist_lib::{ReleaseError, Step};

use crate::cmd::{ReleaseArgs, cmd_plan, cmd_release};
use crate::output::{OutputFormat, print_error};

/// datacol-dist - Cross-compile, package and publish datacol releases
///
/// Reads the release version from VERSION and the deployment environment from
/// DATACOL_ENV. With no STEP the full release runs.
#[derive(Parser)]
#[command(name = "datacol-dist")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Run only this step of the release
  #[arg(value_enum)]
  step: Option<StepArg>,

  /// Release manifest (JSON) overriding names, sources, buckets and matrices
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Local staging directory for built artifacts
  #[arg(long, default_value = DEFAULT_DIST_DIR)]
  dist_dir: PathBuf,

  /// Print the planned actions without running anything
  #[arg(long)]
  dry_run: bool,

  /// Output format
  #[arg(short = 'o', long, value_enum, default_value = "text")]
  output: OutputFormat,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,
}

/// Release steps accepted on the command line.
///
/// The aliases keep the step names of the older release script working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StepArg {
  /// Clean, build API and CLI, archive and publish
  #[value(alias = "push_all")]
  All,
  /// Recreate the local version directory
  #[value(alias = "clean_version_dir")]
  Clean,
  /// Build, archive and upload the API binary
  #[value(alias = "apictl")]
  Api,
  /// Cross-compile the CLI for every target in the matrix
  #[value(alias = "build_all")]
  Build,
  /// Package and upload the per-platform bundles
  #[value(alias = "push_zip")]
  Archive,
  /// Upload the version directory and update the latest pointer
  Publish,
}

impl From<StepArg> for Step {
  fn from(arg: StepArg) -> Self {
    match arg {
      StepArg::All => Step::All,
      StepArg::Clean => Step::Clean,
      StepArg::Api => Step::Api,
      StepArg::Build => Step::Build,
      StepArg::Archive => Step::Archive,
      StepArg::Publish => Step::Publish,
    }
  }
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let args = ReleaseArgs {
    step: cli.step.map_or(Step::All, Step::from),
    manifest: cli.config,
    dist_dir: cli.dist_dir,
    output: cli.output,
  };

  let result = if cli.dry_run {
    cmd_plan(&args)
  } else {
    cmd_release(&args)
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      let code = err
        .downcast_ref::<ReleaseError>()
        .map_or(1, ReleaseError::exit_code);
      ExitCode::from(u8::try_from(code).unwrap_or(1))
    }
  }
}
