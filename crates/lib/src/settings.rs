//! Generator settings.
//!
//! Every component receives its locations and the archive source through a
//! [`Settings`] value instead of reading globals, so tests can point the
//! generator at a temporary build root and a local HTTP server.
//!
//! Resolution order: built-in defaults, then an optional TOML file, then the
//! `COMPGEN_BUILD_ROOT` / `COMPGEN_ARCHIVE_URL` environment variables.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{
  ARCHIVE_URL_ENV, BUILD_ROOT_ENV, DEFAULT_ARCHIVE_FILE_NAME, DEFAULT_ARCHIVE_URL, DEFAULT_STALE_AFTER_SECS,
};
use crate::platform::paths::default_build_root;

#[derive(Debug, Error)]
pub enum SettingsError {
  #[error("failed to read settings file '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse settings file '{path}': {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  #[error("archive file name must end in .zip: {0}")]
  InvalidArchiveName(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
  /// URL the component archive is downloaded from.
  pub archive_url: String,

  /// File name of the archive inside the build root. The extracted
  /// component root is named after it, without the `.zip` extension.
  pub archive_file_name: String,

  /// Directory holding the archive, its extracted tree and every build output.
  pub build_root: PathBuf,

  /// Seconds after which the downloaded archive is considered stale.
  pub stale_after: u64,

  /// Build types produced by a refresh. Empty means every type with a config file.
  pub build_types: Vec<String>,

  /// Optional transfer timeout in seconds. Downloads never time out by default.
  pub fetch_timeout: Option<u64>,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      archive_url: DEFAULT_ARCHIVE_URL.to_string(),
      archive_file_name: DEFAULT_ARCHIVE_FILE_NAME.to_string(),
      build_root: default_build_root(),
      stale_after: DEFAULT_STALE_AFTER_SECS,
      build_types: Vec::new(),
      fetch_timeout: None,
    }
  }
}

impl Settings {
  /// Settings rooted at `build_root`, everything else defaulted.
  pub fn with_build_root(build_root: impl Into<PathBuf>) -> Self {
    Self {
      build_root: build_root.into(),
      ..Self::default()
    }
  }

  /// Resolve settings from an optional TOML file plus environment overrides.
  ///
  /// A missing `path` is only an error when `required` is set; the default
  /// settings file is optional, an explicit `--config` is not.
  pub fn resolve(path: Option<&Path>, required: bool) -> Result<Self, SettingsError> {
    let mut settings = match path {
      Some(path) if required || path.exists() => Self::from_file(path)?,
      _ => Self::default(),
    };
    settings.apply_env();
    settings.validate()?;
    Ok(settings)
  }

  /// Parse a TOML settings file. Keys left out keep their defaults.
  pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let settings: Settings = toml::from_str(&content).map_err(|source| SettingsError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), "loaded settings file");
    Ok(settings)
  }

  fn apply_env(&mut self) {
    if let Ok(root) = std::env::var(BUILD_ROOT_ENV)
      && !root.is_empty()
    {
      self.build_root = PathBuf::from(root);
    }
    if let Ok(url) = std::env::var(ARCHIVE_URL_ENV)
      && !url.is_empty()
    {
      self.archive_url = url;
    }
  }

  pub fn validate(&self) -> Result<(), SettingsError> {
    let stem_ok = self
      .archive_file_name
      .strip_suffix(".zip")
      .is_some_and(|stem| !stem.is_empty() && !stem.contains(['/', '\\']));
    if !stem_ok {
      return Err(SettingsError::InvalidArchiveName(self.archive_file_name.clone()));
    }
    Ok(())
  }

  /// Path of the downloaded archive inside the build root.
  pub fn archive_path(&self) -> PathBuf {
    self.build_root.join(&self.archive_file_name)
  }

  /// Root of the extracted component archive.
  pub fn component_root(&self) -> PathBuf {
    let stem = self
      .archive_file_name
      .strip_suffix(".zip")
      .unwrap_or(&self.archive_file_name);
    self.build_root.join(stem)
  }

  pub fn stale_after(&self) -> Duration {
    Duration::from_secs(self.stale_after)
  }

  pub fn fetch_timeout(&self) -> Option<Duration> {
    self.fetch_timeout.map(Duration::from_secs)
  }
}
