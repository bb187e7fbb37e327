//! Archive download.
//!
//! Streams the body of an HTTP GET straight into the destination file. There
//! is no retry and no integrity check. The destination is truncated before the
//! transfer starts, so a failed transfer leaves an empty or partial file behind.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::consts::APP_NAME;

#[derive(Debug, Error)]
pub enum FetchError {
  #[error("failed to create directory '{0}': {1}")]
  CreateDir(PathBuf, #[source] std::io::Error),

  #[error("failed to open '{0}' for writing: {1}")]
  OpenDest(PathBuf, #[source] std::io::Error),

  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("fetch failed for {url}: {source}")]
  Transport {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("fetch failed for {url}: HTTP {status}")]
  Status { url: String, status: u16 },

  #[error("failed to write '{0}': {1}")]
  Write(PathBuf, #[source] std::io::Error),
}

/// Download `url` into `dest`, returning the number of bytes written.
///
/// `timeout` bounds the whole transfer; `None` waits indefinitely.
pub fn fetch_archive(url: &str, dest: &Path, timeout: Option<Duration>) -> Result<u64, FetchError> {
  info!(url = %url, dest = %dest.display(), "fetching archive");

  if let Some(parent) = dest.parent()
    && !parent.as_os_str().is_empty()
  {
    fs::create_dir_all(parent).map_err(|e| FetchError::CreateDir(parent.to_path_buf(), e))?;
  }

  let file = File::create(dest).map_err(|e| FetchError::OpenDest(dest.to_path_buf(), e))?;
  let mut writer = BufWriter::new(file);

  let client = reqwest::blocking::Client::builder()
    .user_agent(concat!("compgen/", env!("CARGO_PKG_VERSION")))
    .timeout(timeout)
    .build()
    .map_err(FetchError::Client)?;

  let mut response = client.get(url).send().map_err(|source| FetchError::Transport {
    url: url.to_string(),
    source,
  })?;

  let status = response.status();
  if !status.is_success() {
    return Err(FetchError::Status {
      url: url.to_string(),
      status: status.as_u16(),
    });
  }
  debug!(status = status.as_u16(), content_length = ?response.content_length(), "response received");

  let bytes = response.copy_to(&mut writer).map_err(|source| FetchError::Transport {
    url: url.to_string(),
    source,
  })?;
  writer.flush().map_err(|e| FetchError::Write(dest.to_path_buf(), e))?;

  info!(path = %dest.display(), size = bytes, "download complete");
  Ok(bytes)
}

/// Staging directory for a download before it is placed in the build root.
///
/// The directory and anything left in it are removed when the handle drops.
pub fn staging_dir() -> std::io::Result<tempfile::TempDir> {
  tempfile::Builder::new().prefix(&format!("{}-", APP_NAME)).tempdir()
}
