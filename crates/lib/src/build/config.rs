//! Per-type build configuration.
//!
//! A build config is a JSON object whose keys name sections and whose values
//! are section arguments. Key order is kept as written in the file, and that
//! is the order the sections are applied in.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("invalid build config JSON: {0}")]
  Json(#[from] serde_json::Error),

  #[error("build config must be a JSON object, found {0}")]
  NotAnObject(&'static str),
}

/// A recognized (or unrecognized) config section name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Section {
  ReplacementFiles,
  SassReplace,
  Components,
  Templates,
  Js,
  Unknown(String),
}

impl Section {
  pub fn from_key(key: &str) -> Self {
    match key {
      "replacement_files" => Section::ReplacementFiles,
      "sass_replace" => Section::SassReplace,
      "components" => Section::Components,
      "templates" => Section::Templates,
      "js" => Section::Js,
      other => Section::Unknown(other.to_string()),
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      Section::ReplacementFiles => "replacement_files",
      Section::SassReplace => "sass_replace",
      Section::Components => "components",
      Section::Templates => "templates",
      Section::Js => "js",
      Section::Unknown(name) => name,
    }
  }
}

impl fmt::Display for Section {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Ordered mapping of section name to section arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildConfig {
  sections: Map<String, Value>,
}

impl BuildConfig {
  /// Parse a config document, rejecting anything that is not a JSON object.
  pub fn parse(json: &str) -> Result<Self, ConfigError> {
    match serde_json::from_str::<Value>(json)? {
      Value::Object(sections) => Ok(Self { sections }),
      other => Err(ConfigError::NotAnObject(json_kind(&other))),
    }
  }

  /// Load a config file, treating any problem as an empty config.
  ///
  /// Missing, unreadable and malformed files all yield no sections; the
  /// problem is logged and the build proceeds without them.
  pub fn load(path: &Path) -> Self {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) => {
        warn!(path = %path.display(), error = %e, "build config not readable, using empty config");
        return Self::default();
      }
    };

    match Self::parse(&content) {
      Ok(config) => {
        debug!(path = %path.display(), sections = config.len(), "loaded build config");
        config
      }
      Err(e) => {
        warn!(path = %path.display(), error = %e, "build config invalid, using empty config");
        Self::default()
      }
    }
  }

  pub fn to_json(&self) -> Result<String, ConfigError> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  /// Sections in document order.
  pub fn sections(&self) -> impl Iterator<Item = (Section, &Value)> {
    self.sections.iter().map(|(key, value)| (Section::from_key(key), value))
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.sections.get(key)
  }

  pub fn insert(&mut self, key: impl Into<String>, args: Value) -> Option<Value> {
    self.sections.insert(key.into(), args)
  }

  pub fn len(&self) -> usize {
    self.sections.len()
  }

  pub fn is_empty(&self) -> bool {
    self.sections.is_empty()
  }
}

fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}
