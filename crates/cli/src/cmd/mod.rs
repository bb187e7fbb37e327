mod build;
mod clean;
mod extract;
mod refresh;
mod status;
mod watch;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use extract::cmd_extract;
pub use refresh::cmd_refresh;
pub use status::cmd_status;
pub use watch::cmd_watch;
