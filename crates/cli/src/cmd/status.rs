//! Status command implementation.
//!
//! Displays the downloaded archive's age and freshness and the build types
//! available in the extracted component root.

use std::time::SystemTime;

use anyhow::Result;

use compgen_lib::Settings;
use compgen_lib::build::Builder;
use compgen_lib::cache::{snapshot_age, state_for_age};

use crate::output::{ArchiveStatus, OutputFormat, print_status};

pub fn cmd_status(settings: &Settings, output: OutputFormat) -> Result<()> {
  let archive = settings.archive_path();
  let age = snapshot_age(&archive, SystemTime::now());

  let status = ArchiveStatus {
    build_root: settings.build_root.clone(),
    archive,
    archive_url: settings.archive_url.clone(),
    age_secs: age.map(|a| a.as_secs()),
    stale_after_secs: settings.stale_after,
    state: state_for_age(age, settings.stale_after()),
    types: Builder::new(settings).available_types()?,
  };
  output.emit(&status, print_status)
}
