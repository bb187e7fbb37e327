//! Implementation of the `compgen clean` command.

use anyhow::{Context, Result};

use compgen_lib::Settings;
use compgen_lib::build::{Builder, CleanReport};
use compgen_lib::lock::BuildLock;

use crate::output::{OutputFormat, print_clean_report};

pub fn cmd_clean(settings: &Settings, build_type: Option<&str>, output: OutputFormat) -> Result<()> {
  // Taking the lock would create the build root.
  if !settings.build_root.exists() {
    return output.emit(&CleanReport::default(), print_clean_report);
  }

  let _lock = BuildLock::acquire(&settings.build_root, "clean").context("Failed to acquire build lock")?;

  let report = Builder::new(settings).clean(build_type).context("Clean failed")?;
  output.emit(&report, print_clean_report)
}
