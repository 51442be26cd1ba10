// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Frame pipeline switching between a raw view and two phosphene resolutions.

```text
frame ─┬─ Raw ─────────────────────────────────────────────▶ RGB8
       └─ Low/High ─ resize ─ luma ─ detect_edges ─ render ─ to_gray_image ─▶ Luma8
```

Both simulators share the frame size, jitter, intensity variation, aperture
and sigma; they differ only in phosphene resolution.
*/

use std::fmt;
use std::str::FromStr;

use image::imageops::FilterType;
use image::DynamicImage;
use phosphene_config::PhospheneConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::display::{gray_image_to_array, to_gray_image};
use crate::edges::{detect_edges, HysteresisThresholds};
use crate::error::{PhospheneError, PhospheneResult};
use crate::simulator::{PhospheneRender, PhospheneSimulator, SimulatorParameters};
use crate::types::{FrameSize, GridResolution};

/// What the pipeline shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationMode {
    /// Frame passed through untouched
    #[default]
    Raw,
    #[serde(rename = "low")]
    LowResolution,
    #[serde(rename = "high")]
    HighResolution,
}

impl SimulationMode {
    pub const ALL: [SimulationMode; 3] = [
        SimulationMode::Raw,
        SimulationMode::LowResolution,
        SimulationMode::HighResolution,
    ];

    /// Raw → low → high → raw
    pub fn next(self) -> Self {
        match self {
            SimulationMode::Raw => SimulationMode::LowResolution,
            SimulationMode::LowResolution => SimulationMode::HighResolution,
            SimulationMode::HighResolution => SimulationMode::Raw,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SimulationMode::Raw => "raw",
            SimulationMode::LowResolution => "low",
            SimulationMode::HighResolution => "high",
        }
    }
}

impl fmt::Display for SimulationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimulationMode {
    type Err = PhospheneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(SimulationMode::Raw),
            "low" => Ok(SimulationMode::LowResolution),
            "high" => Ok(SimulationMode::HighResolution),
            other => Err(PhospheneError::invalid(format!(
                "unknown simulation mode '{}', expected raw, low or high",
                other
            ))),
        }
    }
}

/// Parameters shared by both simulators plus the edge thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineParameters {
    pub low_resolution: GridResolution,
    pub high_resolution: GridResolution,
    /// Frames are resized to this before edge detection
    pub processing_size: FrameSize,
    pub jitter: f32,
    pub intensity_var: f32,
    pub aperture: f32,
    pub sigma: f32,
    pub edge_thresholds: HysteresisThresholds,
    pub initial_mode: SimulationMode,
}

impl Default for PipelineParameters {
    fn default() -> Self {
        let simulator = SimulatorParameters::default();
        Self {
            low_resolution: GridResolution { rows: 26, cols: 26 },
            high_resolution: GridResolution { rows: 60, cols: 60 },
            processing_size: simulator.size,
            jitter: simulator.jitter,
            intensity_var: simulator.intensity_var,
            aperture: simulator.aperture,
            sigma: 1.2,
            edge_thresholds: HysteresisThresholds::default(),
            initial_mode: SimulationMode::Raw,
        }
    }
}

impl PipelineParameters {
    /// Combine the `[simulator]`, `[pipeline]` and `[edges]` sections
    ///
    /// Grid resolutions, frame size and sigma come from `[pipeline]`; the
    /// `[simulator]` `resolution` and `size` keys are not read here.
    pub fn from_config(config: &PhospheneConfig) -> PhospheneResult<Self> {
        Ok(Self {
            low_resolution: GridResolution::try_from(config.pipeline.low_resolution)?,
            high_resolution: GridResolution::try_from(config.pipeline.high_resolution)?,
            processing_size: FrameSize::try_from(config.pipeline.processing_size)?,
            jitter: config.simulator.jitter,
            intensity_var: config.simulator.intensity_var,
            aperture: config.simulator.aperture,
            sigma: config.pipeline.sigma,
            edge_thresholds: HysteresisThresholds::new(config.edges.low_threshold, config.edges.high_threshold)?,
            initial_mode: config.pipeline.initial_mode.parse()?,
        })
    }

    /// Simulator parameters for one of the two resolutions
    pub fn simulator_parameters(&self, resolution: GridResolution) -> SimulatorParameters {
        SimulatorParameters {
            resolution,
            size: self.processing_size,
            jitter: self.jitter,
            intensity_var: self.intensity_var,
            aperture: self.aperture,
            sigma: self.sigma,
        }
    }
}

/// A low- and a high-resolution simulator behind one mode switch
#[derive(Debug, Clone)]
pub struct DualResolutionSimulator {
    params: PipelineParameters,
    mode: SimulationMode,
    low: PhospheneSimulator,
    high: PhospheneSimulator,
}

impl DualResolutionSimulator {
    /// Build both grids from `rng`, low resolution first
    pub fn new<R: Rng + ?Sized>(params: PipelineParameters, rng: &mut R) -> PhospheneResult<Self> {
        let low = PhospheneSimulator::new_with_rng(params.simulator_parameters(params.low_resolution), rng)?;
        let high = PhospheneSimulator::new_with_rng(params.simulator_parameters(params.high_resolution), rng)?;

        info!(target: "phosphene-engine",
            "Dual-resolution simulator ready: low {}, high {}, frame {}, mode {}",
            params.low_resolution, params.high_resolution, params.processing_size, params.initial_mode);

        Ok(Self {
            params,
            mode: params.initial_mode,
            low,
            high,
        })
    }

    pub fn params(&self) -> &PipelineParameters {
        &self.params
    }

    pub fn mode(&self) -> SimulationMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SimulationMode) {
        if mode != self.mode {
            debug!(target: "phosphene-engine", "Simulation mode {} -> {}", self.mode, mode);
        }
        self.mode = mode;
    }

    /// Advance to the next mode and return it
    pub fn cycle_mode(&mut self) -> SimulationMode {
        self.set_mode(self.mode.next());
        self.mode
    }

    /// Simulator used for `mode`, `None` for raw
    pub fn simulator(&self, mode: SimulationMode) -> Option<&PhospheneSimulator> {
        match mode {
            SimulationMode::Raw => None,
            SimulationMode::LowResolution => Some(&self.low),
            SimulationMode::HighResolution => Some(&self.high),
        }
    }

    /// Resize, detect edges and render with the simulator for `mode`
    ///
    /// Returns `None` in raw mode, where nothing is rendered.
    pub fn render_frame(&self, frame: &DynamicImage, mode: SimulationMode) -> PhospheneResult<Option<PhospheneRender>> {
        let Some(simulator) = self.simulator(mode) else {
            return Ok(None);
        };

        let (height, width) = self.params.processing_size.as_shape();
        let gray = frame
            .resize_exact(width as u32, height as u32, FilterType::Triangle)
            .to_luma8();
        let luma = gray_image_to_array(&gray);
        let mask = detect_edges(
            &luma.view(),
            self.params.edge_thresholds.low(),
            self.params.edge_thresholds.high(),
        )?;

        trace!(target: "phosphene-engine",
            "{} mode: {} edge pixels in {}x{} frame",
            mode, mask.iter().filter(|&&v| v > 0.0).count(), width, height);

        simulator.render(&mask.view()).map(Some)
    }

    /// Process one frame in the current mode
    ///
    /// Raw mode returns the frame as RGB8; phosphene modes return a Luma8
    /// image of the processing size, normalized so the brightest phosphene is
    /// 255.
    pub fn process(&self, frame: &DynamicImage) -> PhospheneResult<DynamicImage> {
        match self.render_frame(frame, self.mode)? {
            None => Ok(DynamicImage::ImageRgb8(frame.to_rgb8())),
            Some(render) => Ok(DynamicImage::ImageLuma8(to_gray_image(&render.frame.view()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phosphene_config::apply_cli_overrides;
    use std::collections::HashMap;

    #[test]
    fn test_mode_parse_and_cycle() {
        assert_eq!("raw".parse::<SimulationMode>().unwrap(), SimulationMode::Raw);
        assert_eq!(" HIGH ".parse::<SimulationMode>().unwrap(), SimulationMode::HighResolution);
        assert!("medium".parse::<SimulationMode>().is_err());

        let mut mode = SimulationMode::Raw;
        for expected in [SimulationMode::LowResolution, SimulationMode::HighResolution, SimulationMode::Raw] {
            mode = mode.next();
            assert_eq!(mode, expected);
        }
        for m in SimulationMode::ALL {
            assert_eq!(m.as_str().parse::<SimulationMode>().unwrap(), m);
        }
    }

    #[test]
    fn test_params_from_default_config() {
        let params = PipelineParameters::from_config(&PhospheneConfig::default()).unwrap();
        assert_eq!(params, PipelineParameters::default());
        let low = params.simulator_parameters(params.low_resolution);
        assert_eq!(low.size, params.processing_size);
        assert_eq!(low.sigma, 1.2);
    }

    #[test]
    fn test_sigma_override_reaches_pipeline() {
        let mut config = PhospheneConfig::default();
        let mut overrides = HashMap::new();
        overrides.insert("sigma".to_string(), "2.5".to_string());
        apply_cli_overrides(&mut config, &overrides).unwrap();

        let params = PipelineParameters::from_config(&config).unwrap();
        assert_eq!(params.sigma, 2.5);
        assert_eq!(params.simulator_parameters(params.high_resolution).sigma, 2.5);
    }

    #[test]
    fn test_simulator_size_does_not_move_pipeline() {
        let mut config = PhospheneConfig::default();
        config.simulator.size = [240, 240];
        let params = PipelineParameters::from_config(&config).unwrap();
        assert_eq!(params.processing_size, FrameSize::new(480, 480).unwrap());
    }

    #[test]
    fn test_bad_mode_in_config() {
        let mut config = PhospheneConfig::default();
        config.pipeline.initial_mode = "sideways".to_string();
        assert!(PipelineParameters::from_config(&config).is_err());
    }
}
