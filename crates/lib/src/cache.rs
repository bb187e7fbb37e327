//! Archive freshness gate.
//!
//! The downloaded archive's modification time is its age. An archive that is
//! missing, or at least `threshold` old, is stale and should be fetched again.

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheState {
  /// Downloaded within the threshold.
  Fresh,
  /// Absent, or older than the threshold.
  Stale,
}

impl CacheState {
  pub fn is_stale(self) -> bool {
    matches!(self, CacheState::Stale)
  }
}

impl std::fmt::Display for CacheState {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      CacheState::Fresh => write!(f, "fresh"),
      CacheState::Stale => write!(f, "stale"),
    }
  }
}

/// Decide the state for a snapshot of the given age. The boundary is stale.
pub fn state_for_age(age: Option<Duration>, threshold: Duration) -> CacheState {
  match age {
    Some(age) if age < threshold => CacheState::Fresh,
    _ => CacheState::Stale,
  }
}

/// Age of the file at `path` relative to `now`, or `None` if it does not exist.
///
/// A modification time in the future counts as age zero.
pub fn snapshot_age(path: &Path, now: SystemTime) -> Option<Duration> {
  let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
  Some(now.duration_since(modified).unwrap_or_default())
}

/// Check the archive at `path` against the wall clock.
pub fn check(path: &Path, threshold: Duration) -> CacheState {
  let age = snapshot_age(path, SystemTime::now());
  let state = state_for_age(age, threshold);
  debug!(path = %path.display(), age_secs = ?age.map(|a| a.as_secs()), %state, "cache check");
  state
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  const THRESHOLD: Duration = Duration::from_secs(1800);

  #[test]
  fn boundary_is_inclusive() {
    assert_eq!(state_for_age(Some(Duration::from_secs(1800)), THRESHOLD), CacheState::Stale);
    assert_eq!(state_for_age(Some(Duration::from_secs(1799)), THRESHOLD), CacheState::Fresh);
  }

  #[test]
  fn missing_snapshot_is_stale() {
    assert_eq!(state_for_age(None, THRESHOLD), CacheState::Stale);

    let temp = TempDir::new().unwrap();
    assert_eq!(check(&temp.path().join("absent.zip"), THRESHOLD), CacheState::Stale);
  }

  #[test]
  fn just_written_file_is_fresh() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("a.zip");
    fs::write(&path, "zip").unwrap();

    assert_eq!(check(&path, THRESHOLD), CacheState::Fresh);
  }

  #[test]
  fn age_is_measured_from_mtime() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("a.zip");
    fs::write(&path, "zip").unwrap();
    let modified = fs::metadata(&path).unwrap().modified().unwrap();

    let later = modified + Duration::from_secs(1800);
    assert_eq!(snapshot_age(&path, later), Some(Duration::from_secs(1800)));
    assert_eq!(state_for_age(snapshot_age(&path, later), THRESHOLD), CacheState::Stale);

    let earlier = modified - Duration::from_secs(60);
    assert_eq!(snapshot_age(&path, earlier), Some(Duration::ZERO));
  }

  #[test]
  fn zero_threshold_is_always_stale() {
    assert_eq!(state_for_age(Some(Duration::ZERO), Duration::ZERO), CacheState::Stale);
  }
}
