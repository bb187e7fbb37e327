//! Fetch, extract and build in one guarded pass.
//!
//! # Layout
//!
//! ```text
//! {build_root}/
//! ├── .lock                          # BuildLock, held for the whole pass
//! ├── theme-components-master.zip    # downloaded archive; its mtime drives the cache gate
//! ├── theme-components-master/       # extracted component root
//! │   ├── configs/type-<type>.json
//! │   └── templates/
//! └── <type>/                        # one output directory per build type
//! ```

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::build::{BuildError, BuildReport, Builder, create_dir};
use crate::cache::{self, CacheState};
use crate::extract::{ExtractError, extract_archive};
use crate::fetch::{FetchError, fetch_archive, staging_dir};
use crate::lock::{BuildLock, BuildLockError};
use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum RefreshError {
  #[error(transparent)]
  Lock(#[from] BuildLockError),

  #[error(transparent)]
  Fetch(#[from] FetchError),

  #[error(transparent)]
  Extract(#[from] ExtractError),

  #[error(transparent)]
  Build(#[from] BuildError),

  #[error("failed to create staging directory: {0}")]
  Staging(#[source] std::io::Error),

  #[error("failed to place archive at '{0}': {1}")]
  Place(PathBuf, #[source] std::io::Error),
}

/// What a refresh did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RefreshOutcome {
  /// The archive was fresh, nothing was fetched.
  Skipped { state: CacheState },
  /// Another refresh holds the build lock.
  InProgress,
  /// The archive was fetched and extracted, and the types were built.
  Completed { bytes: u64, builds: Vec<BuildReport> },
}

/// The generator: one settings value driving every pipeline step.
#[derive(Debug, Clone)]
pub struct Generator {
  settings: Settings,
}

impl Generator {
  pub fn new(settings: Settings) -> Self {
    Self { settings }
  }

  pub fn settings(&self) -> &Settings {
    &self.settings
  }

  pub fn builder(&self) -> Builder<'_> {
    Builder::new(&self.settings)
  }

  /// Current freshness of the downloaded archive.
  pub fn cache_state(&self) -> CacheState {
    cache::check(&self.settings.archive_path(), self.settings.stale_after())
  }

  /// Run the fetch-and-build pass if the archive is stale, or always with `force`.
  ///
  /// Overlapping calls are serialized by the build lock: a call that finds the
  /// lock held returns [`RefreshOutcome::InProgress`] without touching files.
  pub fn refresh(&self, force: bool) -> Result<RefreshOutcome, RefreshError> {
    if !force {
      let state = self.cache_state();
      if !state.is_stale() {
        info!("component archive is fresh, skipping refresh");
        return Ok(RefreshOutcome::Skipped { state });
      }
    }

    let _lock = match BuildLock::acquire(&self.settings.build_root, "refresh") {
      Ok(lock) => lock,
      Err(e) if e.is_contention() => {
        warn!(error = %e, "refresh already in progress");
        return Ok(RefreshOutcome::InProgress);
      }
      Err(e) => return Err(e.into()),
    };

    // A refresh that held the lock before us may have just finished.
    if !force {
      let state = self.cache_state();
      if !state.is_stale() {
        info!("component archive refreshed by another run, skipping");
        return Ok(RefreshOutcome::Skipped { state });
      }
    }

    let bytes = self.fetch_and_extract()?;
    let builds = self.build_all()?;

    info!(bytes, builds = builds.len(), "refresh complete");
    Ok(RefreshOutcome::Completed { bytes, builds })
  }

  /// Download the archive into a staging directory, place it in the build
  /// root and extract it there.
  fn fetch_and_extract(&self) -> Result<u64, RefreshError> {
    let settings = &self.settings;
    create_dir(&settings.build_root)?;

    let staging = staging_dir().map_err(RefreshError::Staging)?;
    let staged = staging.path().join(&settings.archive_file_name);
    let bytes = fetch_archive(&settings.archive_url, &staged, settings.fetch_timeout())?;

    let archive = settings.archive_path();
    fs::copy(&staged, &archive).map_err(|e| RefreshError::Place(archive.clone(), e))?;
    drop(staging);

    // An archive that cannot be extracted must not look fresh to the gate.
    if let Err(e) = extract_archive(&archive) {
      if let Err(remove_err) = fs::remove_file(&archive) {
        warn!(path = %archive.display(), error = %remove_err, "failed to remove unusable archive");
      }
      return Err(e.into());
    }
    Ok(bytes)
  }

  /// Build the configured types, or every available type when none are configured.
  pub fn build_all(&self) -> Result<Vec<BuildReport>, BuildError> {
    let builder = self.builder();
    let types = if self.settings.build_types.is_empty() {
      builder.available_types()?
    } else {
      self.settings.build_types.clone()
    };

    types.iter().map(|build_type| builder.build_type(build_type)).collect()
  }
}
