//! Command lines for the external tools a release drives: the Go compiler and
//! the `gsutil` object-store client.

use std::path::Path;

use crate::execute::process::CommandLine;
use crate::platform::Target;

pub const GO: &str = "go";
pub const GSUTIL: &str = "gsutil";

/// Grant applied to every uploaded object.
pub const PUBLIC_READ: &str = "AllUsers:R";

/// `GOOS=<os> GOARCH=<arch> go build -ldflags=<flags> -o <output> <sources...>`
pub fn go_build(target: &Target, ldflags: &str, output: &Path, sources: &[String]) -> CommandLine {
  let mut command = CommandLine::new(GO)
    .env("GOOS", target.os.as_str())
    .env("GOARCH", target.arch.as_str())
    .arg("build");
  if !ldflags.is_empty() {
    command = command.arg(format!("-ldflags={}", ldflags));
  }
  command
    .arg("-o")
    .arg(output.to_string_lossy())
    .args(sources.iter().cloned())
}

/// `gsutil cp <src> <dest>`
pub fn upload(src: &Path, dest: &str) -> CommandLine {
  CommandLine::new(GSUTIL).args(["cp".to_string(), src.to_string_lossy().into_owned(), dest.to_string()])
}

/// `gsutil cp -r <src> <dest>`
pub fn upload_dir(src: &Path, dest: &str) -> CommandLine {
  CommandLine::new(GSUTIL).args([
    "cp".to_string(),
    "-r".to_string(),
    src.to_string_lossy().into_owned(),
    dest.to_string(),
  ])
}

/// `gsutil acl ch -u AllUsers:R <url>`
pub fn grant_public_read(url: &str) -> CommandLine {
  CommandLine::new(GSUTIL).args(["acl", "ch", "-u", PUBLIC_READ, url])
}

/// `gsutil acl ch -u AllUsers:R -r <url>`
pub fn grant_public_read_recursive(url: &str) -> CommandLine {
  CommandLine::new(GSUTIL).args(["acl", "ch", "-u", PUBLIC_READ, "-r", url])
}
