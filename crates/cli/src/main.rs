mod cmd;
mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use compgen_lib::Settings;
use compgen_lib::platform::paths::default_settings_path;

use crate::output::{OutputFormat, print_error};

/// compgen - Assemble theme builds from a component library archive
#[derive(Parser)]
#[command(name = "compgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Settings file (default: ~/.config/compgen/compgen.toml, if present)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// Override the build root directory
  #[arg(long, global = true)]
  build_root: Option<PathBuf>,

  /// Output format
  #[arg(short = 'o', long, global = true, value_enum, default_value = "text")]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Fetch, extract and build if the component archive is stale
  Refresh {
    /// Refresh even if the archive is fresh
    #[arg(short, long)]
    force: bool,
  },

  /// Build one type from the extracted component archive
  Build {
    /// Build type name (reads configs/type-<TYPE>.json)
    #[arg(value_name = "TYPE")]
    build_type: String,
  },

  /// Extract a zip archive into the directory that contains it
  Extract {
    /// Path to the zip archive
    archive: PathBuf,
  },

  /// Show archive freshness and available build types
  Status,

  /// Remove build output
  Clean {
    /// Only remove this type's output
    #[arg(value_name = "TYPE")]
    build_type: Option<String>,
  },

  /// Check the archive periodically and refresh it when stale
  Watch {
    /// Time between checks (e.g., "30s", "5m")
    #[arg(long, value_parser = humantime::parse_duration, default_value = "60s")]
    interval: Duration,

    /// Stop after this many checks
    #[arg(long)]
    count: Option<u64>,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<()> {
  let output = cli.output;
  let settings = || load_settings(cli.config.as_deref(), cli.build_root.as_deref());

  match &cli.command {
    Commands::Refresh { force } => cmd::cmd_refresh(settings()?, *force, output),
    Commands::Build { build_type } => cmd::cmd_build(&settings()?, build_type, output),
    Commands::Extract { archive } => cmd::cmd_extract(archive, output),
    Commands::Status => cmd::cmd_status(&settings()?, output),
    Commands::Clean { build_type } => cmd::cmd_clean(&settings()?, build_type.as_deref(), output),
    Commands::Watch { interval, count } => cmd::cmd_watch(settings()?, *interval, *count, output),
  }
}

fn load_settings(config: Option<&Path>, build_root: Option<&Path>) -> Result<Settings> {
  let (path, required) = match config {
    Some(path) => (path.to_path_buf(), true),
    None => (default_settings_path(), false),
  };

  let mut settings = Settings::resolve(Some(&path), required).context("Failed to load settings")?;
  if let Some(root) = build_root {
    settings.build_root = root.to_path_buf();
  }
  Ok(settings)
}
