//! Implementation of the `compgen extract` command.

use std::path::Path;

use anyhow::{Context, Result};

use compgen_lib::extract::extract_archive;

use crate::output::{Extracted, OutputFormat, print_extracted};

pub fn cmd_extract(archive: &Path, output: OutputFormat) -> Result<()> {
  let extracted_to = extract_archive(archive).context("Extraction failed")?;

  let extracted = Extracted {
    archive: archive.to_path_buf(),
    extracted_to,
  };
  output.emit(&extracted, print_extracted)
}
