//! Host lifecycle integration.
//!
//! The host delivers two signals per execution: `init` early, and
//! `render-complete` as late as possible. On `init` the session checks the
//! archive's freshness and, if it is stale, queues one deferred refresh. On
//! `render-complete` the queued refresh runs, once. Signals may arrive more
//! than once; extra deliveries are no-ops.
//!
//! Hosts in an administrative context never instantiate a session.

use tracing::{debug, info};

use crate::cache::CacheState;
use crate::refresh::{Generator, RefreshError, RefreshOutcome};

/// What the host knows about the current execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostContext {
  pub administrative: bool,
}

/// Per-execution hook state for one generator.
#[derive(Debug)]
pub struct HookSession<'a> {
  generator: &'a Generator,
  pending: bool,
}

impl<'a> HookSession<'a> {
  /// Start a session, or `None` in an administrative context.
  pub fn new(generator: &'a Generator, context: HostContext) -> Option<Self> {
    if context.administrative {
      debug!("administrative context, generator hooks disabled");
      return None;
    }
    Some(Self {
      generator,
      pending: false,
    })
  }

  /// Handle the `init` signal: queue a refresh when the archive is stale.
  pub fn on_init(&mut self) -> CacheState {
    let state = self.generator.cache_state();
    if state.is_stale() && !self.pending {
      info!("component archive stale, refresh scheduled");
      self.pending = true;
    }
    state
  }

  /// Handle the `render-complete` signal: run the queued refresh, if any.
  pub fn on_render_complete(&mut self) -> Result<Option<RefreshOutcome>, RefreshError> {
    if !std::mem::take(&mut self.pending) {
      return Ok(None);
    }
    // The gate already decided; the build lock still guards against overlap.
    self.generator.refresh(true).map(Some)
  }

  pub fn is_pending(&self) -> bool {
    self.pending
  }
}
