//! compgen-lib: Core logic for the component theme generator
//!
//! This crate fetches a component library archive, extracts it, and assembles
//! per-type theme builds from it:
//! - `fetch` / `extract`: download and unpack the archive
//! - `sync`: recursive copy with basename exclusions
//! - `build`: per-type orchestration driven by JSON configs
//! - `cache`: freshness gate on the downloaded archive
//! - `refresh`: the locked fetch, extract and build pass
//! - `hooks`: init / render-complete integration for a host runtime

pub mod build;
pub mod cache;
pub mod consts;
pub mod extract;
pub mod fetch;
pub mod hooks;
pub mod lock;
pub mod platform;
pub mod refresh;
pub mod settings;
pub mod sync;
pub mod util;

pub use refresh::{Generator, RefreshError, RefreshOutcome};
pub use settings::Settings;
