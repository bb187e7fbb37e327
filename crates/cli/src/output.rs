//! Rendering of compgen results.
//!
//! Every command hands its result to [`OutputFormat::emit`]: with `-o json` the
//! result is printed as one pretty JSON document, otherwise one of the text
//! renderers below draws it. Warnings and errors go to stderr.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream, Style};
use serde::Serialize;

use compgen_lib::RefreshOutcome;
use compgen_lib::build::{BuildReport, CleanReport};
use compgen_lib::cache::CacheState;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }

  /// Print `value` as JSON, or render it with `text`.
  pub fn emit<T: Serialize>(self, value: &T, text: impl FnOnce(&T)) -> anyhow::Result<()> {
    match self {
      OutputFormat::Json => {
        let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
        println!("{}", json);
      }
      OutputFormat::Text => text(value),
    }
    Ok(())
  }
}

#[derive(Debug, Clone, Copy)]
enum Tone {
  Success,
  Info,
  Warning,
  Error,
}

impl Tone {
  fn symbol(self) -> &'static str {
    match self {
      Tone::Success => "✓",
      Tone::Info => "•",
      Tone::Warning => "⚠",
      Tone::Error => "✗",
    }
  }

  fn style(self) -> Style {
    match self {
      Tone::Success => Style::new().green(),
      Tone::Info => Style::new().blue(),
      Tone::Warning => Style::new().yellow(),
      Tone::Error => Style::new().red(),
    }
  }
}

fn say(tone: Tone, message: &str) {
  let style = tone.style();
  match tone {
    Tone::Success | Tone::Info => println!(
      "{} {}",
      tone.symbol().if_supports_color(Stream::Stdout, |s| s.style(style)),
      message
    ),
    Tone::Warning | Tone::Error => eprintln!(
      "{} {}",
      tone.symbol().if_supports_color(Stream::Stderr, |s| s.style(style)),
      message.if_supports_color(Stream::Stderr, |s| s.style(style))
    ),
  }
}

fn stat(label: &str, value: &str) {
  println!("  {}: {}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()), value);
}

fn item(value: &str) {
  println!("    → {}", value);
}

pub fn print_info(message: &str) {
  say(Tone::Info, message);
}

pub fn print_error(message: &str) {
  say(Tone::Error, message);
}

pub fn format_bytes(bytes: u64) -> String {
  const UNITS: [&str; 3] = ["KB", "MB", "GB"];

  if bytes < 1024 {
    return format!("{} B", bytes);
  }
  let mut value = bytes as f64 / 1024.0;
  let mut unit = 0;
  while value >= 1024.0 && unit + 1 < UNITS.len() {
    value /= 1024.0;
    unit += 1;
  }
  format!("{:.1} {}", value, UNITS[unit])
}

/// Wall-clock time at millisecond resolution, e.g. `1m 5s` or `1s 500ms`.
pub fn format_elapsed(elapsed: Duration) -> String {
  let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
  humantime::format_duration(Duration::from_millis(millis)).to_string()
}

pub fn print_outcome(outcome: &RefreshOutcome) {
  match outcome {
    RefreshOutcome::Skipped { state } => {
      say(Tone::Info, &format!("Component archive is {}, nothing to do", state));
    }
    RefreshOutcome::InProgress => {
      say(Tone::Warning, "Another refresh holds the build lock, skipping");
    }
    RefreshOutcome::Completed { bytes, builds } => {
      say(Tone::Success, "Refresh complete!");
      stat("Downloaded", &format_bytes(*bytes));
      stat("Types built", &builds.len().to_string());
      for report in builds {
        stat(
          &report.build_type,
          &format!(
            "{} files, {} templates",
            report.synced.files_copied,
            report.templates_copied.len()
          ),
        );
      }
    }
  }
}

pub fn print_build_report(report: &BuildReport) {
  say(Tone::Success, &format!("Built {}", report.build_type));
  stat("Target", &report.target_dir.display().to_string());
  stat("Files copied", &report.synced.files_copied.to_string());
  stat("Templates copied", &report.templates_copied.len().to_string());

  if !report.templates_missing.is_empty() {
    say(Tone::Warning, "Templates not found in the component archive:");
    for name in &report.templates_missing {
      item(name);
    }
  }
  if !report.skipped.is_empty() {
    stat("Sections without a handler", &report.skipped.join(", "));
  }
  if !report.unknown.is_empty() {
    stat("Unknown sections", &report.unknown.join(", "));
  }
}

pub fn print_clean_report(report: &CleanReport) {
  if report.removed.is_empty() {
    say(Tone::Info, "Nothing to clean");
    return;
  }

  say(Tone::Success, &format!("Removed {} path(s)", report.removed.len()));
  for path in &report.removed {
    item(&path.display().to_string());
  }
}

/// Result of `compgen extract`.
#[derive(Debug, Serialize)]
pub struct Extracted {
  pub archive: PathBuf,
  pub extracted_to: PathBuf,
}

pub fn print_extracted(extracted: &Extracted) {
  say(Tone::Success, &format!("Extracted {}", extracted.archive.display()));
  stat("Destination", &extracted.extracted_to.display().to_string());
}

/// Snapshot of a build root as shown by `compgen status`.
#[derive(Debug, Serialize)]
pub struct ArchiveStatus {
  pub build_root: PathBuf,
  pub archive: PathBuf,
  pub archive_url: String,
  pub age_secs: Option<u64>,
  pub stale_after_secs: u64,
  pub state: CacheState,
  pub types: Vec<String>,
}

pub fn print_status(status: &ArchiveStatus) {
  match status.age_secs {
    Some(age) => {
      let age = humantime::format_duration(Duration::from_secs(age));
      match status.state {
        CacheState::Stale => say(
          Tone::Warning,
          &format!("Component archive is stale (downloaded {} ago)", age),
        ),
        CacheState::Fresh => say(
          Tone::Success,
          &format!("Component archive is fresh (downloaded {} ago)", age),
        ),
      }
    }
    None => say(
      Tone::Info,
      "No component archive downloaded yet. Run 'compgen refresh' to fetch one.",
    ),
  }

  stat("Build root", &status.build_root.display().to_string());
  stat("Source", &status.archive_url);
  stat(
    "Refresh after",
    &humantime::format_duration(Duration::from_secs(status.stale_after_secs)).to_string(),
  );

  if status.types.is_empty() {
    stat("Types", "none");
  } else {
    stat("Types", &status.types.len().to_string());
    for build_type in &status.types {
      item(build_type);
    }
  }
}
