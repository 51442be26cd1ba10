// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! This module provides validation logic to ensure configuration values are
//! consistent and within the ranges the simulator accepts.

use crate::{ConfigError, ConfigResult, PhospheneConfig};

const KNOWN_MODES: &[&str] = &["raw", "low", "high"];
const KNOWN_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const KNOWN_FORMATS: &[&str] = &["text", "json"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    ZeroDimension { field: String },
    OutOfRange { field: String, value: f32, range: String },
    UnknownOption { field: String, value: String, allowed: &'static [&'static str] },
    Inconsistent { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension { field } => {
                write!(f, "{} must have non-zero entries", field)
            }
            Self::OutOfRange { field, value, range } => {
                write!(f, "{} = {} is outside valid range {}", field, value, range)
            }
            Self::UnknownOption { field, value, allowed } => {
                write!(f, "{} = '{}' is not one of {}", field, value, allowed.join(", "))
            }
            Self::Inconsistent { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Non-zero grid resolutions and image sizes
/// - Simulator value ranges (sigma, jitter, intensity variation, aperture)
/// - Edge threshold ordering
/// - Known pipeline modes and logging options
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &PhospheneConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_dimensions(config, &mut errors);
    validate_value_ranges(config, &mut errors);
    validate_edges(config, &mut errors);
    validate_options(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_dimensions(config: &PhospheneConfig, errors: &mut Vec<ConfigValidationError>) {
    let pairs = [
        ("simulator.resolution", config.simulator.resolution),
        ("simulator.size", config.simulator.size),
        ("pipeline.low_resolution", config.pipeline.low_resolution),
        ("pipeline.high_resolution", config.pipeline.high_resolution),
        ("pipeline.processing_size", config.pipeline.processing_size),
    ];
    for (field, dims) in pairs {
        if dims.contains(&0) {
            errors.push(ConfigValidationError::ZeroDimension {
                field: field.to_string(),
            });
        }
    }

    // More phosphenes than pixels cannot be placed on the image
    let grid_checks = [
        ("simulator.resolution", config.simulator.resolution, config.simulator.size),
        ("pipeline.low_resolution", config.pipeline.low_resolution, config.pipeline.processing_size),
        ("pipeline.high_resolution", config.pipeline.high_resolution, config.pipeline.processing_size),
    ];
    for (field, resolution, size) in grid_checks {
        if resolution[0] > size[0] || resolution[1] > size[1] {
            errors.push(ConfigValidationError::Inconsistent {
                field: field.to_string(),
                reason: format!("{:?} exceeds image size {:?}", resolution, size),
            });
        }
    }
}

fn validate_value_ranges(config: &PhospheneConfig, errors: &mut Vec<ConfigValidationError>) {
    let sim = &config.simulator;

    for (field, sigma) in [("simulator.sigma", sim.sigma), ("pipeline.sigma", config.pipeline.sigma)] {
        if !(sigma > 0.0) || !sigma.is_finite() {
            errors.push(ConfigValidationError::OutOfRange {
                field: field.to_string(),
                value: sigma,
                range: "(0, inf)".to_string(),
            });
        }
    }

    if !(0.0..=1.0).contains(&sim.jitter) {
        errors.push(ConfigValidationError::OutOfRange {
            field: "simulator.jitter".to_string(),
            value: sim.jitter,
            range: "[0, 1]".to_string(),
        });
    }

    // Intensities are 1 + var * (u - 0.5); var >= 2 allows non-positive phosphenes
    if !(0.0..2.0).contains(&sim.intensity_var) {
        errors.push(ConfigValidationError::OutOfRange {
            field: "simulator.intensity_var".to_string(),
            value: sim.intensity_var,
            range: "[0, 2)".to_string(),
        });
    }

    if !(sim.aperture > 0.0 && sim.aperture <= 1.0) {
        errors.push(ConfigValidationError::OutOfRange {
            field: "simulator.aperture".to_string(),
            value: sim.aperture,
            range: "(0, 1]".to_string(),
        });
    }
}

fn validate_edges(config: &PhospheneConfig, errors: &mut Vec<ConfigValidationError>) {
    let edges = &config.edges;
    if !(edges.low_threshold >= 0.0) {
        errors.push(ConfigValidationError::OutOfRange {
            field: "edges.low_threshold".to_string(),
            value: edges.low_threshold,
            range: "[0, inf)".to_string(),
        });
    }
    if edges.low_threshold > edges.high_threshold {
        errors.push(ConfigValidationError::Inconsistent {
            field: "edges.high_threshold".to_string(),
            reason: format!(
                "must be >= edges.low_threshold ({} < {})",
                edges.high_threshold, edges.low_threshold
            ),
        });
    }
}

fn validate_options(config: &PhospheneConfig, errors: &mut Vec<ConfigValidationError>) {
    let options = [
        ("pipeline.initial_mode", config.pipeline.initial_mode.to_lowercase(), KNOWN_MODES),
        ("logging.level", config.logging.level.to_lowercase(), KNOWN_LEVELS),
        ("logging.format", config.logging.format.to_lowercase(), KNOWN_FORMATS),
    ];
    for (field, value, allowed) in options {
        if !allowed.contains(&value.as_str()) {
            errors.push(ConfigValidationError::UnknownOption {
                field: field.to_string(),
                value,
                allowed,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PhospheneConfig::default();
        let result = validate_config(&config);
        if let Err(e) = &result {
            eprintln!("Validation error: {}", e);
        }
        assert!(result.is_ok());
    }

    #[test]
    fn test_zero_resolution() {
        let mut config = PhospheneConfig::default();
        config.simulator.resolution = [0, 50];

        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("simulator.resolution"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_positive_sigma() {
        let mut config = PhospheneConfig::default();
        config.simulator.sigma = 0.0;

        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("simulator.sigma"));
                assert!(msg.contains("(0, inf)"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_aperture_and_jitter_ranges() {
        let mut config = PhospheneConfig::default();
        config.simulator.aperture = 1.5;
        config.simulator.jitter = -0.1;

        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("simulator.aperture"));
                assert!(msg.contains("simulator.jitter"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_inverted_edge_thresholds() {
        let mut config = PhospheneConfig::default();
        config.edges.low_threshold = 80.0;
        config.edges.high_threshold = 40.0;

        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(msg)) if msg.contains("edges.high_threshold")));
    }

    #[test]
    fn test_unknown_mode() {
        let mut config = PhospheneConfig::default();
        config.pipeline.initial_mode = "ultra".to_string();

        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("pipeline.initial_mode"));
                assert!(msg.contains("raw, low, high"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_resolution_larger_than_image() {
        let mut config = PhospheneConfig::default();
        config.pipeline.high_resolution = [600, 60];

        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(msg)) if msg.contains("pipeline.high_resolution")));
    }
}
