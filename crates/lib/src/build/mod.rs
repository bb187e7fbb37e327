//! Per-type build orchestration.
//!
//! A build type is a named flavor of the generated theme. Building a type:
//!
//! 1. creates `<build_root>/<type>`,
//! 2. loads `<component_root>/configs/type-<type>.json`,
//! 3. copies the component root into the target, minus source-only
//!    directories and repository metadata,
//! 4. applies each config section in document order.
//!
//! Only the `templates` section does file work. `replacement_files`,
//! `sass_replace`, `components` and `js` are recognized, but what they should
//! do to a build is undefined, so they are reported as skipped.
//!
//! # Submodules
//!
//! - [`config`] - Build config loading
//! - [`templates`] - The `templates` section handler

pub mod config;
pub mod templates;
mod types;

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

pub use config::{BuildConfig, ConfigError, Section};
pub use types::*;

use crate::lock::LOCK_FILENAME;
use crate::settings::Settings;
use crate::sync::{ExclusionSet, sync_dir};

/// Directory of per-type configs inside the component root.
pub const CONFIGS_DIR: &str = "configs";

const CONFIG_PREFIX: &str = "type-";
const CONFIG_SUFFIX: &str = ".json";

/// Builds types from an extracted component archive.
#[derive(Debug, Clone)]
pub struct Builder<'a> {
  settings: &'a Settings,
}

impl<'a> Builder<'a> {
  pub fn new(settings: &'a Settings) -> Self {
    Self { settings }
  }

  pub fn component_root(&self) -> PathBuf {
    self.settings.component_root()
  }

  pub fn target_dir(&self, build_type: &str) -> PathBuf {
    self.settings.build_root.join(build_type)
  }

  pub fn config_path(&self, build_type: &str) -> PathBuf {
    self
      .component_root()
      .join(CONFIGS_DIR)
      .join(format!("{}{}{}", CONFIG_PREFIX, build_type, CONFIG_SUFFIX))
  }

  /// Build one type into `<build_root>/<type>`.
  pub fn build_type(&self, build_type: &str) -> Result<BuildReport, BuildError> {
    validate_type(build_type)?;

    let component_root = self.component_root();
    let target_dir = self.target_dir(build_type);
    info!(build_type, target = %target_dir.display(), "building type");

    create_dir(&target_dir)?;

    let config = BuildConfig::load(&self.config_path(build_type));

    if !component_root.is_dir() {
      warn!(path = %component_root.display(), "component archive not extracted, nothing to copy");
    }
    let synced = sync_dir(&component_root, &target_dir, &ExclusionSet::build())?;

    let mut report = BuildReport {
      build_type: build_type.to_string(),
      target_dir: target_dir.clone(),
      synced,
      ..BuildReport::default()
    };

    for (section, args) in config.sections() {
      self.apply_section(&section, args, &target_dir, &mut report)?;
    }

    info!(
      build_type,
      files = report.synced.files_copied,
      templates = report.templates_copied.len(),
      skipped = report.skipped.len(),
      "build complete"
    );
    Ok(report)
  }

  fn apply_section(
    &self,
    section: &Section,
    args: &Value,
    target_dir: &Path,
    report: &mut BuildReport,
  ) -> Result<(), BuildError> {
    match section {
      Section::Templates => {
        templates::add_templates(args, &self.component_root(), target_dir, report)?;
        report.applied.push(section.to_string());
      }
      Section::ReplacementFiles | Section::SassReplace | Section::Components | Section::Js => {
        debug!(section = %section, "section handler not implemented, skipping");
        report.skipped.push(section.to_string());
      }
      Section::Unknown(name) => {
        debug!(section = %name, "unknown section ignored");
        report.unknown.push(name.clone());
      }
    }
    Ok(())
  }

  /// Build types that have a config file in the component root, sorted.
  ///
  /// Returns an empty list when the archive has not been extracted.
  pub fn available_types(&self) -> Result<Vec<String>, BuildError> {
    let configs = self.component_root().join(CONFIGS_DIR);
    if !configs.is_dir() {
      return Ok(Vec::new());
    }

    let entries = fs::read_dir(&configs).map_err(|e| BuildError::ReadDir(configs.clone(), e))?;
    let mut types: Vec<String> = entries
      .flatten()
      .filter(|entry| entry.path().is_file())
      .filter_map(|entry| {
        let name = entry.file_name().into_string().ok()?;
        let build_type = name.strip_prefix(CONFIG_PREFIX)?.strip_suffix(CONFIG_SUFFIX)?;
        validate_type(build_type).ok()?;
        Some(build_type.to_string())
      })
      .collect();
    types.sort();
    Ok(types)
  }

  /// Remove build output.
  ///
  /// With a type, removes that type's target directory. Without one, empties
  /// the build root (archive, extracted tree and every output), keeping only
  /// the lock file.
  pub fn clean(&self, build_type: Option<&str>) -> Result<CleanReport, BuildError> {
    let mut report = CleanReport::default();

    let paths = match build_type {
      Some(build_type) => {
        validate_type(build_type)?;
        vec![self.target_dir(build_type)]
      }
      None => {
        let root = &self.settings.build_root;
        if !root.is_dir() {
          return Ok(report);
        }
        fs::read_dir(root)
          .map_err(|e| BuildError::ReadDir(root.clone(), e))?
          .flatten()
          .filter(|entry| entry.file_name() != LOCK_FILENAME)
          .map(|entry| entry.path())
          .collect()
      }
    };

    for path in paths {
      if !path.exists() {
        continue;
      }
      let result = if path.is_dir() {
        fs::remove_dir_all(&path)
      } else {
        fs::remove_file(&path)
      };
      result.map_err(|e| BuildError::Remove(path.clone(), e))?;
      debug!(path = %path.display(), "removed");
      report.removed.push(path);
    }

    report.removed.sort();
    Ok(report)
  }
}

/// A build type must be usable as a single directory name.
fn validate_type(build_type: &str) -> Result<(), BuildError> {
  let mut components = Path::new(build_type).components();
  match (components.next(), components.next()) {
    (Some(Component::Normal(_)), None) if !build_type.contains(['/', '\\']) => Ok(()),
    _ => Err(BuildError::InvalidType(build_type.to_string())),
  }
}

/// Create a directory and its parents, with the build directory mode on unix.
pub(crate) fn create_dir(path: &Path) -> Result<(), BuildError> {
  if path.is_dir() {
    return Ok(());
  }

  let mut builder = fs::DirBuilder::new();
  builder.recursive(true);
  #[cfg(unix)]
  {
    use std::os::unix::fs::DirBuilderExt;
    builder.mode(crate::consts::BUILD_DIR_MODE);
  }
  builder
    .create(path)
    .map_err(|e| BuildError::CreateDir(path.to_path_buf(), e))
}
