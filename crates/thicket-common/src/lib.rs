//! Common utilities for the thicket selector engine.
//!
//! This crate provides shared infrastructure used by the tree and query crates:
//! - **Warning System** - colored, deduplicated diagnostics on stderr

pub mod warning;
