//! Implementation of the `compgen watch` command.
//!
//! Delivers the host signals from a timer: every tick runs `init` followed by
//! `render-complete` on a fresh hook session. The refresh itself is blocking,
//! so it runs on the blocking pool. Ctrl-C is honored between ticks and while a
//! refresh runs; in the latter case the running pass is allowed to finish so
//! the build root is not left half-written.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::MissedTickBehavior;
use tracing::debug;

use compgen_lib::hooks::{HookSession, HostContext};
use compgen_lib::{Generator, RefreshError, RefreshOutcome, Settings};

use crate::output::{OutputFormat, print_error, print_info, print_outcome};

pub fn cmd_watch(settings: Settings, interval: Duration, count: Option<u64>, output: OutputFormat) -> Result<()> {
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  rt.block_on(watch(Arc::new(Generator::new(settings)), interval, count, output))
}

async fn watch(generator: Arc<Generator>, interval: Duration, count: Option<u64>, output: OutputFormat) -> Result<()> {
  let mut ticker = tokio::time::interval(interval);
  ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

  let shutdown = tokio::signal::ctrl_c();
  tokio::pin!(shutdown);

  if !output.is_json() {
    print_info(&format!(
      "Watching {} every {}",
      generator.settings().archive_url,
      humantime::format_duration(interval)
    ));
  }

  let mut ticks = 0u64;
  loop {
    if count.is_some_and(|max| ticks >= max) {
      break;
    }

    tokio::select! {
      _ = ticker.tick() => {}
      _ = &mut shutdown => {
        if !output.is_json() {
          print_info("Stopping");
        }
        break;
      }
    }

    ticks += 1;
    let worker = Arc::clone(&generator);
    let mut task = tokio::task::spawn_blocking(move || run_signals(&worker));

    let finished = tokio::select! {
      joined = &mut task => Some(joined),
      _ = &mut shutdown => None,
    };
    let interrupted = finished.is_none();
    let joined = match finished {
      Some(joined) => joined,
      None => {
        if !output.is_json() {
          print_info("Stopping once the running refresh finishes");
        }
        task.await
      }
    };

    report(joined.context("Refresh task panicked")?, ticks, output)?;
    if interrupted {
      break;
    }
  }

  Ok(())
}

fn run_signals(generator: &Generator) -> Result<Option<RefreshOutcome>, RefreshError> {
  let Some(mut session) = HookSession::new(generator, HostContext::default()) else {
    return Ok(None);
  };
  session.on_init();
  session.on_render_complete()
}

fn report(result: Result<Option<RefreshOutcome>, RefreshError>, tick: u64, output: OutputFormat) -> Result<()> {
  match result {
    Ok(Some(outcome)) => output.emit(&outcome, print_outcome)?,
    Ok(None) => debug!(tick, "archive fresh"),
    // Failed fetches and extractions leave the archive stale, so the next tick retries.
    Err(e) => print_error(&format!("Refresh failed: {:#}", anyhow::Error::from(e))),
  }
  Ok(())
}
