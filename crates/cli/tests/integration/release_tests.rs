//! End-to-end release runs.

use std::fs::File;
use std::io::Read;

use predicates::prelude::*;
use zip::ZipArchive;

use super::common::TestEnv;

#[test]
fn full_dev_release_builds_archives_and_publishes() {
  let env = TestEnv::new();

  env
    .dist_cmd("1.0.0", "dev")
    .assert()
    .success()
    .stdout(predicate::str::contains("ENV:dev bucket:gs://datacol-dev/1.0.0"))
    .stdout(predicate::str::contains("Step 'all' for 1.0.0 complete"));

  assert_eq!(
    env.list(&env.dist().join("1.0.0")),
    vec![
      "apictl",
      "apictl.zip",
      "datacol",
      "datacol-darwin-amd64",
      "datacol-linux-amd64",
      "linux.zip",
      "osx.zip",
    ]
  );
  assert_eq!(std::fs::read_to_string(env.dist().join("latest.txt")).unwrap(), "1.0.0\n");

  assert_eq!(
    env.gsutil_calls(),
    vec![
      "cp dist/1.0.0/apictl.zip gs://datacol-dev/binaries/1.0.0/apictl.zip",
      "acl ch -u AllUsers:R gs://datacol-dev/binaries/1.0.0/apictl.zip",
      "cp dist/1.0.0/osx.zip gs://datacol-dev/osx.zip",
      "acl ch -u AllUsers:R gs://datacol-dev/osx.zip",
      "cp dist/1.0.0/linux.zip gs://datacol-dev/linux.zip",
      "acl ch -u AllUsers:R gs://datacol-dev/linux.zip",
      "cp -r dist/1.0.0 gs://datacol-dev/binaries",
      "cp dist/latest.txt gs://datacol-dev/binaries/latest.txt",
      "acl ch -u AllUsers:R -r gs://datacol-dev/binaries",
    ]
  );
}

#[test]
fn prod_build_matches_full_matrix() {
  let env = TestEnv::new();

  env.dist_cmd("2.0.0", "prod").arg("build").assert().success();

  assert_eq!(
    env.list(&env.dist().join("2.0.0")),
    vec![
      "datacol-darwin-386",
      "datacol-darwin-amd64",
      "datacol-linux-386",
      "datacol-linux-amd64",
      "datacol-linux-arm",
      "datacol-windows-386.exe",
      "datacol-windows-amd64.exe",
    ]
  );
  // build alone uploads nothing
  assert!(env.gsutil_calls().is_empty());
}

#[test]
fn bundles_hold_canonical_binary() {
  let env = TestEnv::new();

  env.dist_cmd("1.0.0", "dev").arg("build").assert().success();
  env.dist_cmd("1.0.0", "dev").arg("archive").assert().success();

  for (bundle, target) in [("osx.zip", "darwin amd64"), ("linux.zip", "linux amd64")] {
    let file = File::open(env.dist().join("1.0.0").join(bundle)).unwrap();
    let mut archive = ZipArchive::new(file).unwrap();
    assert_eq!(archive.len(), 1);

    let mut entry = archive.by_index(0).unwrap();
    assert_eq!(entry.name(), "datacol");

    let mut contents = String::new();
    entry.read_to_string(&mut contents).unwrap();
    assert_eq!(contents, format!("built for {}\n", target));
  }
}

#[test]
fn failed_upload_halts_release_with_its_exit_code() {
  let env = TestEnv::new();

  env
    .dist_cmd("1.0.0", "dev")
    .env("GSUTIL_FAIL_ON", "osx.zip")
    .env("GSUTIL_FAIL_CODE", "7")
    .assert()
    .code(7)
    .stdout(predicate::str::contains("gsutil cp dist/1.0.0/osx.zip gs://datacol-dev/osx.zip"))
    .stderr(predicate::str::contains("AccessDeniedException"))
    .stderr(predicate::str::contains("exit code 7"));

  let calls = env.gsutil_calls();
  assert_eq!(calls.last().unwrap(), "cp dist/1.0.0/osx.zip gs://datacol-dev/osx.zip");
  assert!(!calls.iter().any(|c| c.contains("linux.zip") || c.contains("latest.txt")));
  assert!(!env.dist().join("latest.txt").exists());
}

#[test]
fn failed_publish_keeps_previous_pointer() {
  let env = TestEnv::new();

  env.dist_cmd("1.0.0", "dev").assert().success();

  env
    .dist_cmd("1.1.0", "dev")
    .env("GSUTIL_FAIL_ON", "cp -r")
    .env("GSUTIL_FAIL_CODE", "3")
    .assert()
    .code(3);

  assert_eq!(std::fs::read_to_string(env.dist().join("latest.txt")).unwrap(), "1.0.0\n");
}

#[test]
fn rerun_regenerates_version_directory() {
  let env = TestEnv::new();

  env.dist_cmd("1.0.0", "dev").arg("build").assert().success();
  std::fs::write(env.dist().join("1.0.0").join("leftover.txt"), "stale").unwrap();

  env.dist_cmd("1.0.0", "dev").assert().success();

  assert!(!env.dist().join("1.0.0").join("leftover.txt").exists());
}

#[test]
fn tool_progress_on_stderr_is_shown_live() {
  let env = TestEnv::new();
  env.dist_cmd("1.0.0", "dev").arg("build").assert().success();
  env.install_tool(
    "gsutil",
    "#!/bin/sh\necho \"$*\" >> \"$GSUTIL_LOG\"\necho \"Copying file://$2 [Content-Type=application/zip]...\" >&2\necho \"gsutil-stdout-noise\"\n",
  );

  env
    .dist_cmd("1.0.0", "dev")
    .arg("archive")
    .assert()
    .success()
    .stderr(predicate::str::contains(
      "Copying file://dist/1.0.0/osx.zip [Content-Type=application/zip]...",
    ))
    .stdout(predicate::str::contains("gsutil-stdout-noise").not());
}

#[test]
fn missing_toolchain_fails_before_uploading() {
  let env = TestEnv::without_tools();
  env.install_tool("gsutil", "#!/bin/sh\necho \"$*\" >> \"$GSUTIL_LOG\"\n");

  env
    .dist_cmd("1.0.0", "dev")
    .env("PATH", &env.bin_dir)
    .assert()
    .code(1)
    .stderr(predicate::str::contains("failed to spawn"));

  assert!(env.gsutil_calls().is_empty());
}

#[test]
fn json_report_summarizes_run() {
  let env = TestEnv::new();

  let assert = env
    .dist_cmd("1.0.0", "dev")
    .args(["-o", "json"])
    .assert()
    .success()
    .stderr(predicate::str::contains("gsutil cp -r dist/1.0.0 gs://datacol-dev/binaries"));

  let report: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
  assert_eq!(report["step"], "all");
  assert_eq!(report["version"], "1.0.0");
  assert_eq!(report["commands"], 12);
  assert_eq!(report["archives"].as_array().unwrap().len(), 3);
}
