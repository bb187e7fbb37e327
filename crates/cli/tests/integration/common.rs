//! Shared test helpers for CLI integration tests.

use std::io::Write;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// Name of the extracted component root for the default archive file name.
pub const COMPONENT_ROOT: &str = "theme-components-master";

/// A component archive in the layout the generator expects.
pub const COMPONENT_FILES: &[(&str, &str)] = &[
  ("style.css", "/* base */"),
  ("functions.php", "<?php // base"),
  ("README.md", "# docs"),
  ("configs/type-blog.json", r#"{"templates": ["index.html"], "sass_replace": {}}"#),
  ("configs/type-portfolio.json", r#"{"templates": ["index.html", "gallery.html"]}"#),
  ("templates/index.html", "<main>index</main>"),
];

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding the build root and an
/// empty config home, so no user settings leak in.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn empty() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Environment whose build root already holds an extracted component archive.
  pub fn extracted() -> Self {
    let env = Self::empty();
    let root = env.build_root().join(COMPONENT_ROOT);
    for (relative, content) in COMPONENT_FILES {
      write_file(&root.join(relative), content);
    }
    env
  }

  /// Build root (isolated per test).
  pub fn build_root(&self) -> PathBuf {
    let p = self.temp.path().join("build");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  fn config_home(&self) -> PathBuf {
    let p = self.temp.path().join("config");
    std::fs::create_dir_all(&p).unwrap();
    p
  }

  /// Get a pre-configured Command for the compgen binary.
  ///
  /// Sets environment variables for isolated testing:
  /// - `COMPGEN_BUILD_ROOT`: Isolated build root
  /// - `XDG_CONFIG_HOME` / `APPDATA`: Empty config home
  pub fn compgen_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("compgen");
    cmd.env("COMPGEN_BUILD_ROOT", self.build_root());
    cmd.env_remove("COMPGEN_ARCHIVE_URL");
    cmd.env("XDG_CONFIG_HOME", self.config_home());
    cmd.env("APPDATA", self.config_home()); // For Windows
    cmd.env_remove("RUST_LOG");
    cmd
  }
}

pub fn write_file(path: &Path, content: &str) {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }
  std::fs::write(path, content).unwrap();
}

/// Zip `COMPONENT_FILES` under the component root folder, as the remote serves it.
pub fn component_archive() -> Vec<u8> {
  let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
  for (relative, content) in COMPONENT_FILES {
    writer
      .start_file(format!("{}/{}", COMPONENT_ROOT, relative), SimpleFileOptions::default())
      .unwrap();
    writer.write_all(content.as_bytes()).unwrap();
  }
  writer.finish().unwrap().into_inner()
}
