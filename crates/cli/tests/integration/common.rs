//! Shared test helpers for release integration tests.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Stand-in for `go build`: writes `built for <GOOS> <GOARCH>` to the `-o` path.
const FAKE_GO: &str = r#"#!/bin/sh
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then
    out="$2"
    shift
  fi
  shift
done
[ -n "$out" ] || exit 2
mkdir -p "$(dirname "$out")"
echo "built for $GOOS $GOARCH" > "$out"
"#;

/// Stand-in for `gsutil`: logs its arguments, optionally failing on a pattern.
const FAKE_GSUTIL: &str = r#"#!/bin/sh
echo "$*" >> "$GSUTIL_LOG"
if [ -n "$GSUTIL_FAIL_ON" ]; then
  case "$*" in
    *"$GSUTIL_FAIL_ON"*)
      echo "AccessDeniedException: 403 Forbidden" >&2
      exit "${GSUTIL_FAIL_CODE:-1}"
      ;;
  esac
fi
exit 0
"#;

/// Isolated release workspace.
///
/// Each test gets its own temporary working directory with fake tools on `PATH`.
pub struct TestEnv {
  pub temp: TempDir,
  pub bin_dir: PathBuf,
}

impl TestEnv {
  /// Workspace with both fake `go` and fake `gsutil` installed.
  pub fn new() -> Self {
    let env = Self::without_tools();
    env.install_tool("go", FAKE_GO);
    env.install_tool("gsutil", FAKE_GSUTIL);
    env
  }

  /// Workspace with an empty tool directory.
  pub fn without_tools() -> Self {
    let temp = TempDir::new().unwrap();
    let bin_dir = temp.path().join("bin");
    std::fs::create_dir_all(&bin_dir).unwrap();
    Self { temp, bin_dir }
  }

  pub fn install_tool(&self, name: &str, script: &str) {
    let path = self.bin_dir.join(name);
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  }

  /// Command for releasing `version` to `env` from the workspace.
  ///
  /// Only the fake tool directory and the system directories are on `PATH`.
  pub fn dist_cmd(&self, version: &str, env: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("datacol-dist");
    cmd
      .current_dir(self.temp.path())
      .env("PATH", format!("{}:/usr/bin:/bin", self.bin_dir.display()))
      .env("VERSION", version)
      .env("DATACOL_ENV", env)
      .env("GSUTIL_LOG", self.gsutil_log())
      .env_remove("GSUTIL_FAIL_ON")
      .env_remove("RUST_LOG");
    cmd
  }

  pub fn gsutil_log(&self) -> PathBuf {
    self.temp.path().join("gsutil.log")
  }

  /// Arguments of every gsutil invocation, in order.
  pub fn gsutil_calls(&self) -> Vec<String> {
    match std::fs::read_to_string(self.gsutil_log()) {
      Ok(log) => log.lines().map(str::to_string).collect(),
      Err(_) => Vec::new(),
    }
  }

  pub fn dist(&self) -> PathBuf {
    self.temp.path().join("dist")
  }

  /// Sorted file names in `dir`.
  pub fn list(&self, dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
      .unwrap()
      .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
      .collect();
    names.sort();
    names
  }
}
