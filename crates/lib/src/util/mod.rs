//! Shared utilities.
//!
//! Test helpers for building fixture archives and directory trees.

#[cfg(test)]
pub mod testutil;
