//! Recursive directory copy with basename exclusions.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, trace};
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum SyncError {
  #[error("failed to walk '{path}': {source}")]
  Walk {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error("failed to create directory '{0}': {1}")]
  CreateDir(PathBuf, #[source] std::io::Error),

  #[error("failed to copy '{from}' to '{to}': {source}")]
  Copy {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Basenames never copied into a build: repository metadata, docs, OS artifacts.
const METADATA_NAMES: &[&str] = &[
  ".travis.yml",
  "codesniffer.ruleset.xml",
  "README.md",
  "CONTRIBUTING.md",
  ".git",
  ".svn",
  ".DS_Store",
  ".gitignore",
];

/// Component-archive layout directories that are source material, not build output.
const LAYOUT_NAMES: &[&str] = &["assets", "components", "configs", "templates", "types"];

/// A set of file or directory basenames that the synchronizer skips.
///
/// A matching directory is skipped together with everything below it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
  names: BTreeSet<String>,
}

impl ExclusionSet {
  pub fn new<I, S>(names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      names: names.into_iter().map(Into::into).collect(),
    }
  }

  /// Repository metadata that is never part of any build.
  pub fn metadata() -> Self {
    Self::new(METADATA_NAMES.iter().copied())
  }

  /// Exclusions for the initial copy of a build: metadata plus the archive's
  /// source-only directories.
  pub fn build() -> Self {
    Self::metadata().with(LAYOUT_NAMES.iter().copied())
  }

  pub fn with<I, S>(mut self, names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.names.extend(names.into_iter().map(Into::into));
    self
  }

  pub fn contains(&self, name: &OsStr) -> bool {
    name.to_str().is_some_and(|name| self.names.contains(name))
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.names.iter().map(String::as_str)
  }
}

/// Counters for one synchronization pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct SyncStats {
  pub files_copied: usize,
  pub dirs_created: usize,
  pub bytes_copied: u64,
}

/// Copy the tree under `source` into `target`, skipping excluded basenames.
///
/// Existing files in `target` are overwritten. A missing `source` is not an
/// error and copies nothing. Symlinks to directories are not followed, and
/// symlinks whose target is missing are skipped.
pub fn sync_dir(source: &Path, target: &Path, exclude: &ExclusionSet) -> Result<SyncStats, SyncError> {
  let mut stats = SyncStats::default();

  if !source.is_dir() {
    debug!(source = %source.display(), "source directory missing, nothing to copy");
    return Ok(stats);
  }

  fs::create_dir_all(target).map_err(|e| SyncError::CreateDir(target.to_path_buf(), e))?;

  let walker = WalkDir::new(source)
    .min_depth(1)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|entry| entry.depth() == 0 || !exclude.contains(entry.file_name()));

  for entry in walker {
    let entry = entry.map_err(|source_err| SyncError::Walk {
      path: source.to_path_buf(),
      source: source_err,
    })?;

    let Ok(relative) = entry.path().strip_prefix(source) else {
      continue;
    };
    let dest = target.join(relative);

    let file_type = entry.file_type();
    if file_type.is_dir() {
      if !dest.is_dir() {
        fs::create_dir_all(&dest).map_err(|e| SyncError::CreateDir(dest.clone(), e))?;
        stats.dirs_created += 1;
      }
      continue;
    }

    if file_type.is_symlink() {
      if entry.path().is_dir() {
        trace!(path = %entry.path().display(), "skipping symlinked directory");
        continue;
      }
      if !entry.path().exists() {
        debug!(path = %entry.path().display(), "skipping dangling symlink");
        continue;
      }
    }

    let bytes = fs::copy(entry.path(), &dest).map_err(|e| SyncError::Copy {
      from: entry.path().to_path_buf(),
      to: dest.clone(),
      source: e,
    })?;
    trace!(file = %relative.display(), bytes, "copied");
    stats.files_copied += 1;
    stats.bytes_copied += bytes;
  }

  debug!(
    source = %source.display(),
    target = %target.display(),
    files = stats.files_copied,
    dirs = stats.dirs_created,
    "directory synchronized"
  );
  Ok(stats)
}
