// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `phosphene_configuration.toml`. Two-element arrays are `[rows, cols]` for
//! grid resolutions and `[height, width]` for image sizes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PhospheneConfig {
    pub simulator: SimulatorConfig,
    pub pipeline: PipelineConfig,
    pub edges: EdgeConfig,
    pub logging: LoggingConfig,
}

/// Phosphene grid and rendering parameters
///
/// `resolution` and `size` describe a single simulator built with
/// `SimulatorParameters::from_config`. The frame pipeline uses the
/// `[pipeline]` resolutions and `processing_size` instead.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Number of phosphenes as `[rows, cols]`
    pub resolution: [u32; 2],
    /// Output image size as `[height, width]`
    pub size: [u32; 2],
    /// Positional jitter as a fraction of phosphene spacing (0..=1)
    pub jitter: f32,
    /// Spread of the per-phosphene intensity around 1.0
    pub intensity_var: f32,
    /// Receptive field diameter as a fraction of phosphene spacing
    pub aperture: f32,
    /// Gaussian blur standard deviation in pixels
    pub sigma: f32,
    /// Seed for grid construction. `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            resolution: [50, 50],
            size: [480, 480],
            jitter: 0.35,
            intensity_var: 0.9,
            aperture: 0.66,
            sigma: 0.8,
            seed: None,
        }
    }
}

/// Dual resolution frame pipeline
///
/// Both simulators reuse `jitter`, `intensity_var`, `aperture` and `seed` from
/// the `[simulator]` section and render at `processing_size`. The `sigma`
/// override (`PHOSPHENE_SIGMA` or CLI `sigma`) sets `sigma` here too.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub low_resolution: [u32; 2],
    pub high_resolution: [u32; 2],
    /// Frames are resized to this `[height, width]` before edge detection
    pub processing_size: [u32; 2],
    pub sigma: f32,
    /// One of "raw", "low", "high"
    pub initial_mode: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            low_resolution: [26, 26],
            high_resolution: [60, 60],
            processing_size: [480, 480],
            sigma: 1.2,
            initial_mode: "raw".to_string(),
        }
    }
}

/// Edge detection thresholds (applied to L1 Sobel magnitude)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EdgeConfig {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            low_threshold: 35.0,
            high_threshold: 70.0,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level (trace, debug, info, warn, error)
    pub level: String,
    /// "text" or "json"
    pub format: String,
    /// Write logs to `log_dir` in addition to the console
    pub file_logging: bool,
    pub log_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            file_logging: false,
            log_dir: PathBuf::from("./logs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: PhospheneConfig = toml::from_str(
            r#"
            [simulator]
            resolution = [26, 26]
            sigma = 1.2
            "#,
        )
        .unwrap();

        assert_eq!(config.simulator.resolution, [26, 26]);
        assert_eq!(config.simulator.sigma, 1.2);
        assert_eq!(config.simulator.size, [480, 480]);
        assert_eq!(config.simulator.seed, None);
        assert_eq!(config.edges, EdgeConfig::default());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = PhospheneConfig::default();
        config.simulator.seed = Some(7);
        config.pipeline.initial_mode = "high".to_string();

        let text = toml::to_string(&config).unwrap();
        let parsed: PhospheneConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
