mod common;

mod build_tests;
mod clean_tests;
mod extract_tests;
mod refresh_tests;
mod status_tests;
mod watch_tests;
