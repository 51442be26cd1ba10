// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Phosphene Render Tool

Runs one image through the frame pipeline and writes the result as PNG.

Usage:
  cargo run --bin phosphene_render -- --input frame.jpg --output phosphenes.png --mode low

Per-crate debug logging: `--debug-phosphene-engine`, `--debug-all`, or
`PHOSPHENE_DEBUG=phosphene-engine`.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use phosphene_sim::config::{
    apply_cli_overrides, apply_environment_overrides, load_config, validate_config, ConfigError,
    PhospheneConfig,
};
use phosphene_sim::engine::rng::make_rng;
use phosphene_sim::engine::{DualResolutionSimulator, PipelineParameters};
use phosphene_sim::observability::{debug_flags_help, init_logging, parse_debug_flags, LogFormat, LoggingOptions};

/// Render an image as simulated prosthetic vision
#[derive(Parser, Debug)]
#[command(name = "phosphene_render", version, long_about = None, after_help = debug_flags_help())]
struct Args {
    /// Image to process (any format the image crate decodes)
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the PNG result
    #[arg(short, long)]
    output: PathBuf,

    /// Configuration file; searched for when omitted, defaults used if none exists
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulation mode: raw, low or high (overrides the configured initial mode)
    #[arg(short, long)]
    mode: Option<String>,

    /// Seed for reproducible phosphene grids
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if let Some(mode) = &self.mode {
            overrides.insert("mode".to_string(), mode.clone());
        }
        if let Some(seed) = self.seed {
            overrides.insert("seed".to_string(), seed.to_string());
        }
        if let Some(level) = &self.log_level {
            overrides.insert("log_level".to_string(), level.clone());
        }
        overrides
    }
}

fn main() -> Result<()> {
    // `--debug-*` flags are handled by the logging setup, not clap
    let debug_flags = parse_debug_flags();
    let args = Args::parse_from(env::args().filter(|arg| !arg.starts_with("--debug-")));

    let config = resolve_config(&args)?;
    validate_config(&config).context("Invalid configuration")?;

    let logging_options = LoggingOptions {
        level: config.logging.level.clone(),
        format: config
            .logging
            .format
            .parse::<LogFormat>()
            .map_err(anyhow::Error::msg)?,
        log_dir: config.logging.file_logging.then(|| config.logging.log_dir.clone()),
    };
    let logging_guard = init_logging(&debug_flags, &logging_options)?;
    if debug_flags.any_enabled() {
        debug!(target: "phosphene-sim", "Debug logging enabled for {:?}", debug_flags.enabled_crates);
    }
    if let Some(dir) = logging_guard.log_dir() {
        info!(target: "phosphene-sim", "Writing logs to {}", dir.display());
    }

    info!(target: "phosphene-sim", "Reading {}", args.input.display());
    let frame = image::open(&args.input).with_context(|| format!("Failed to open {}", args.input.display()))?;
    debug!(target: "phosphene-sim", "Input frame {}x{}", frame.width(), frame.height());

    let params = PipelineParameters::from_config(&config)?;
    let mut rng = make_rng(config.simulator.seed);
    let simulator = DualResolutionSimulator::new(params, &mut rng)?;

    let output = simulator.process(&frame)?;
    output
        .save_with_format(&args.output, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!(target: "phosphene-sim",
        "Wrote {} ({} mode, {}x{})",
        args.output.display(), simulator.mode(), output.width(), output.height());
    Ok(())
}

fn resolve_config(args: &Args) -> Result<PhospheneConfig> {
    let overrides = args.overrides();
    match load_config(args.config.as_deref(), Some(&overrides)) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) if args.config.is_none() => {
            let mut config = PhospheneConfig::default();
            apply_environment_overrides(&mut config);
            apply_cli_overrides(&mut config, &overrides)?;
            Ok(config)
        }
        Err(err) => Err(err).context("Failed to load configuration"),
    }
}
