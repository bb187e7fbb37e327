use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::sync::{SyncError, SyncStats};

#[derive(Debug, Error)]
pub enum BuildError {
  #[error("invalid build type name: '{0}'")]
  InvalidType(String),

  #[error("failed to create directory '{0}': {1}")]
  CreateDir(PathBuf, #[source] std::io::Error),

  #[error("failed to copy template '{name}': {source}")]
  CopyTemplate {
    name: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to read '{0}': {1}")]
  ReadDir(PathBuf, #[source] std::io::Error),

  #[error("failed to remove '{0}': {1}")]
  Remove(PathBuf, #[source] std::io::Error),

  #[error(transparent)]
  Sync(#[from] SyncError),
}

/// What a single `build_type` call did.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
  pub build_type: String,
  pub target_dir: PathBuf,

  /// Files and directories copied from the component root.
  pub synced: SyncStats,

  /// Sections whose handler ran.
  pub applied: Vec<String>,

  /// Recognized sections whose handler performs no work yet.
  pub skipped: Vec<String>,

  /// Section names the generator does not know.
  pub unknown: Vec<String>,

  /// Template files copied into `<target>/templates`.
  pub templates_copied: Vec<String>,

  /// Template files named in the config but absent from the component root.
  pub templates_missing: Vec<String>,
}

/// Result of [`super::Builder::clean`].
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CleanReport {
  pub removed: Vec<PathBuf>,
}
