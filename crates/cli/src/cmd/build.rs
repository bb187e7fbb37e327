//! Implementation of the `compgen build` command.

use anyhow::{Context, Result};

use compgen_lib::Settings;
use compgen_lib::build::Builder;
use compgen_lib::lock::BuildLock;

use crate::output::{OutputFormat, print_build_report};

pub fn cmd_build(settings: &Settings, build_type: &str, output: OutputFormat) -> Result<()> {
  let _lock = BuildLock::acquire(&settings.build_root, "build").context("Failed to acquire build lock")?;

  let report = Builder::new(settings)
    .build_type(build_type)
    .with_context(|| format!("Failed to build type '{}'", build_type))?;

  output.emit(&report, print_build_report)
}
