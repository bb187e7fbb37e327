//! Application-wide constants and defaults.

pub const APP_NAME: &str = "compgen";

/// Remote component archive fetched when no other source is configured.
pub const DEFAULT_ARCHIVE_URL: &str = "https://codeload.github.com/Automattic/theme-components/zip/master";

/// File name the archive is stored under inside the build root.
pub const DEFAULT_ARCHIVE_FILE_NAME: &str = "theme-components-master.zip";

/// Age in seconds after which a downloaded archive is considered stale (30 minutes).
pub const DEFAULT_STALE_AFTER_SECS: u64 = 1800;

/// Environment variable overriding the build root.
pub const BUILD_ROOT_ENV: &str = "COMPGEN_BUILD_ROOT";

/// Environment variable overriding the archive URL.
pub const ARCHIVE_URL_ENV: &str = "COMPGEN_ARCHIVE_URL";

/// Permission bits for directories created under the build root.
#[cfg(unix)]
pub const BUILD_DIR_MODE: u32 = 0o755;
