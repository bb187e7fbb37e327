//! Zip extraction.
//!
//! The archive is unpacked next to itself: entries land in the directory that
//! contains the zip file, with the archive's own top-level folder kept intact.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ExtractError {
  #[error("could not resolve the directory of '{path}': {source}")]
  Resolve {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("couldn't open the zip: {path}: {source}")]
  Open {
    path: PathBuf,
    #[source]
    source: zip::result::ZipError,
  },

  #[error("failed to read entry {index} of '{path}': {source}")]
  Entry {
    path: PathBuf,
    index: usize,
    #[source]
    source: zip::result::ZipError,
  },

  #[error("zip entry escapes the extraction directory: {0}")]
  UnsafeEntry(String),

  #[error("failed to write '{0}': {1}")]
  Write(PathBuf, #[source] std::io::Error),
}

/// Extract every entry of `zip_path` into the directory containing it.
///
/// Returns the directory the archive was extracted into.
pub fn extract_archive(zip_path: &Path) -> Result<PathBuf, ExtractError> {
  let resolved = dunce::canonicalize(zip_path).map_err(|source| ExtractError::Resolve {
    path: zip_path.to_path_buf(),
    source,
  })?;
  let dest = resolved
    .parent()
    .map(Path::to_path_buf)
    .unwrap_or_else(|| PathBuf::from("."));

  let open_err = |source| ExtractError::Open {
    path: zip_path.to_path_buf(),
    source,
  };
  let file = File::open(&resolved).map_err(|e| open_err(zip::result::ZipError::Io(e)))?;
  let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(open_err)?;

  info!(archive = %zip_path.display(), dest = %dest.display(), entries = archive.len(), "extracting archive");

  for index in 0..archive.len() {
    let mut entry = archive.by_index(index).map_err(|source| ExtractError::Entry {
      path: zip_path.to_path_buf(),
      index,
      source,
    })?;

    let relative = entry
      .enclosed_name()
      .ok_or_else(|| ExtractError::UnsafeEntry(entry.name().to_string()))?;
    let out_path = dest.join(&relative);

    if entry.is_dir() {
      fs::create_dir_all(&out_path).map_err(|e| ExtractError::Write(out_path.clone(), e))?;
      continue;
    }

    if let Some(parent) = out_path.parent() {
      fs::create_dir_all(parent).map_err(|e| ExtractError::Write(parent.to_path_buf(), e))?;
    }

    let mut outfile = File::create(&out_path).map_err(|e| ExtractError::Write(out_path.clone(), e))?;
    std::io::copy(&mut entry, &mut outfile).map_err(|e| ExtractError::Write(out_path.clone(), e))?;
    debug!(entry = %relative.display(), size = entry.size(), "extracted");

    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      if let Some(mode) = entry.unix_mode() {
        fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))
          .map_err(|e| ExtractError::Write(out_path.clone(), e))?;
      }
    }
  }

  Ok(dest)
}
