//! Zip archive creation for distributable bundles.

use std::fs::File;
use std::io;
use std::path::Path;

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ReleaseError;

/// Mode stored for the archived executable.
const EXECUTABLE_MODE: u32 = 0o755;

/// Write a zip archive at `dest` holding `source` as its single entry `entry`.
///
/// Any existing file at `dest` is replaced. Returns the size of the finished
/// archive in bytes.
pub fn write_archive(source: &Path, entry: &str, dest: &Path) -> Result<u64, ReleaseError> {
  let mut input = File::open(source).map_err(|e| ReleaseError::io(source, e))?;
  let output = File::create(dest).map_err(|e| ReleaseError::io(dest, e))?;

  let zip_err = |source| ReleaseError::Archive {
    path: dest.to_path_buf(),
    source,
  };

  let options = SimpleFileOptions::default()
    .compression_method(CompressionMethod::Deflated)
    .unix_permissions(EXECUTABLE_MODE);

  let mut writer = ZipWriter::new(output);
  writer.start_file(entry, options).map_err(zip_err)?;
  io::copy(&mut input, &mut writer).map_err(|e| ReleaseError::io(dest, e))?;
  let output = writer.finish().map_err(zip_err)?;

  let size = output.metadata().map_err(|e| ReleaseError::io(dest, e))?.len();
  debug!(archive = %dest.display(), entry, size, "archive written");
  Ok(size)
}
