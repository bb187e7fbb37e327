//! Implementation of the `compgen refresh` command.
//!
//! Runs the gated fetch, extract and build pass once. Suitable for cron.

use std::time::Instant;

use anyhow::{Context, Result};

use compgen_lib::{Generator, Settings};

use crate::output::{OutputFormat, format_elapsed, print_info, print_outcome};

pub fn cmd_refresh(settings: Settings, force: bool, output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let generator = Generator::new(settings);

  let outcome = generator.refresh(force).context("Refresh failed")?;

  output.emit(&outcome, |outcome| {
    print_outcome(outcome);
    print_info(&format!("Finished in {}", format_elapsed(start.elapsed())));
  })
}
