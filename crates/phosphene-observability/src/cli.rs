// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-phosphene-engine` to raise a single crate to
//! debug level while everything else stays at the configured default.

use std::collections::BTreeSet;
use std::env;

use crate::KNOWN_CRATES;

/// Parsed `--debug-*` flags
///
/// # Example
/// ```rust
/// use phosphene_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-phosphene-engine".to_string()]);
/// assert!(flags.is_enabled("phosphene-engine"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrateDebugFlags {
    pub enabled_crates: BTreeSet<String>,
}

impl CrateDebugFlags {
    /// Parse debug flags from command-line arguments
    ///
    /// Looks for arguments matching `--debug-{crate-name}` pattern.
    /// Also supports `--debug-all` to enable all crates.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = CrateDebugFlags::default();

        for arg in args {
            if arg == "--debug-all" {
                flags.enable_all();
                continue;
            }

            if let Some(crate_name) = arg.strip_prefix("--debug-") {
                flags.enabled_crates.insert(crate_name.to_string());
            }
        }

        flags
    }

    /// Merge a `PHOSPHENE_DEBUG` style value (`all` or comma-separated crate names)
    pub fn merge_env_value(&mut self, value: &str) {
        if value.trim() == "all" {
            self.enable_all();
            return;
        }
        for crate_name in value.split(',') {
            let crate_name = crate_name.trim();
            if !crate_name.is_empty() {
                self.enabled_crates.insert(crate_name.to_string());
            }
        }
    }

    fn enable_all(&mut self) {
        for crate_name in KNOWN_CRATES {
            self.enabled_crates.insert(crate_name.to_string());
        }
    }

    /// Check if debug is enabled for a specific crate
    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains(crate_name)
    }

    /// Check if debug is enabled for any crate
    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Create an `EnvFilter` directive string from the debug flags
    ///
    /// Format: `"phosphene-engine=debug,info"`, or just `default_level` when no
    /// crate is enabled.
    pub fn to_filter_string(&self, default_level: &str) -> String {
        let mut filters: Vec<String> = self
            .enabled_crates
            .iter()
            .map(|crate_name| format!("{}=debug", crate_name))
            .collect();
        filters.push(default_level.to_string());
        filters.join(",")
    }
}

/// Parse debug flags from the process arguments and `PHOSPHENE_DEBUG`
///
/// Environment variable format: comma-separated crate names, e.g.
/// `"phosphene-engine,phosphene-config"`, or `all`.
pub fn parse_debug_flags() -> CrateDebugFlags {
    debug_flags_from(env::args(), env::var("PHOSPHENE_DEBUG").ok().as_deref())
}

fn debug_flags_from<I>(args: I, env_value: Option<&str>) -> CrateDebugFlags
where
    I: IntoIterator<Item = String>,
{
    let mut flags = CrateDebugFlags::from_args(args);
    if let Some(value) = env_value {
        flags.merge_env_value(value);
    }
    flags
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}          Enable debug logging for specific crate

Available crates:
  {}

Environment Variable:
  PHOSPHENE_DEBUG={{crate-name}}[,{{crate-name}}]  Enable debug for crates (comma-separated)
  PHOSPHENE_DEBUG=all                            Enable debug for all crates
"#,
        KNOWN_CRATES.join(", ")
    )
}
