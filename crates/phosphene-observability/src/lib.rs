// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # phosphene-observability
//!
//! Logging setup shared by the phosphene crates and tools.
//!
//! Library crates only emit `tracing` events with their crate name as target;
//! binaries call [`init_logging`] once to install a subscriber. Per-crate debug
//! output is switched on with `--debug-<crate>` arguments or the
//! `PHOSPHENE_DEBUG` environment variable.
//!
//! ## Features
//! - `file-logging`: daily rotated log files in addition to the console

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;
pub mod options;

pub use cli::*;
pub use init::*;
pub use options::*;

/// Known crate names (and tracing targets) for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "phosphene-engine",
    "phosphene-config",
    "phosphene-observability",
    "phosphene-sim",
];
