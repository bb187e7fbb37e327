//! The `templates` section handler.

use std::fs;
use std::path::{Component, Path};

use serde_json::Value;
use tracing::{debug, warn};

use super::types::{BuildError, BuildReport};
use super::create_dir;

/// Directory name of templates in both the component root and the build target.
pub const TEMPLATES_DIR: &str = "templates";

/// Copy each template named in `args` from `<component_root>/templates` into
/// `<target_dir>/templates`, overwriting existing files.
///
/// Names missing from the source are recorded and skipped. Entries that are
/// not strings, or that are not plain relative paths, are ignored.
pub fn add_templates(
  args: &Value,
  component_root: &Path,
  target_dir: &Path,
  report: &mut BuildReport,
) -> Result<(), BuildError> {
  let Some(names) = args.as_array() else {
    warn!(section = TEMPLATES_DIR, "templates section is not a list, ignoring");
    return Ok(());
  };

  let source_dir = component_root.join(TEMPLATES_DIR);
  let dest_dir = target_dir.join(TEMPLATES_DIR);
  create_dir(&dest_dir)?;

  for name in names {
    let Some(name) = name.as_str() else {
      warn!(entry = %name, "template entry is not a string, ignoring");
      continue;
    };
    if !is_plain_relative(name) {
      warn!(template = name, "template name must be a relative path inside templates/, ignoring");
      continue;
    }

    let from = source_dir.join(name);
    if !from.is_file() {
      debug!(template = name, source = %from.display(), "template missing from component archive");
      report.templates_missing.push(name.to_string());
      continue;
    }

    let to = dest_dir.join(name);
    if let Some(parent) = to.parent() {
      create_dir(parent)?;
    }
    fs::copy(&from, &to).map_err(|source| BuildError::CopyTemplate {
      name: name.to_string(),
      source,
    })?;
    debug!(template = name, "template copied");
    report.templates_copied.push(name.to_string());
  }

  Ok(())
}

fn is_plain_relative(name: &str) -> bool {
  let components: Vec<Component<'_>> = Path::new(name).components().collect();
  components.iter().any(|c| matches!(c, Component::Normal(_)))
    && components
      .iter()
      .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
