//! Test utilities for compgen-lib.
//!
//! Helpers that build fixture trees and zip archives on disk.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;

/// Write a zip archive at `path`.
///
/// Each entry is `(name, content)`; a `None` content adds a directory entry.
pub fn write_zip(path: &Path, entries: &[(&str, Option<&str>)]) {
  let file = File::create(path).unwrap();
  let mut writer = zip::ZipWriter::new(file);
  let options = SimpleFileOptions::default();

  for (name, content) in entries {
    match content {
      Some(content) => {
        writer.start_file(*name, options).unwrap();
        std::io::Write::write_all(&mut writer, content.as_bytes()).unwrap();
      }
      None => {
        writer.add_directory(*name, options).unwrap();
      }
    }
  }

  writer.finish().unwrap();
}

/// Write `files` (relative path, content) under `root`, creating parents.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
  for (relative, content) in files {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
  }
}

/// All paths under `root`, relative and sorted, using `/` separators.
pub fn list_tree(root: &Path) -> Vec<String> {
  let mut paths: Vec<String> = walkdir::WalkDir::new(root)
    .min_depth(1)
    .into_iter()
    .filter_map(|e| e.ok())
    .map(|e| {
      let relative: PathBuf = e.path().strip_prefix(root).unwrap().to_path_buf();
      relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
    })
    .collect();
  paths.sort();
  paths
}

/// A component archive fixture in the layout the generator expects.
pub const COMPONENT_FIXTURE: &[(&str, &str)] = &[
  ("style.css", "/* base */"),
  ("functions.php", "<?php // base"),
  ("README.md", "# docs"),
  ("CONTRIBUTING.md", "# contributing"),
  (".gitignore", "node_modules"),
  ("inc/template-tags.php", "<?php // tags"),
  ("inc/.DS_Store", "junk"),
  ("assets/logo.svg", "<svg/>"),
  ("components/header/header.php", "<?php // header"),
  ("configs/type-blog.json", r#"{"templates": ["index.html", "single.html"], "js": ["nav.js"]}"#),
  ("configs/type-portfolio.json", r#"{"components": ["header"], "templates": ["index.html"]}"#),
  ("templates/index.html", "<main>index</main>"),
  ("templates/single.html", "<main>single</main>"),
  ("templates/partials/footer.html", "<footer/>"),
  ("types/blog/style.css", "/* blog */"),
];
