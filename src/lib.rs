// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # phosphene-sim - Simulated Prosthetic Vision
//!
//! Renders activation masks (usually edge maps of camera frames) as fields of
//! phosphenes, the spots of light perceived through a visual prosthesis.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! phosphene-sim = "0.1"
//! ```
//!
//! ```rust,no_run
//! use phosphene_sim::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let simulator = PhospheneSimulator::new_with_rng(SimulatorParameters::default(), &mut rng)?;
//!
//! let mask = Array2::<f32>::zeros((480, 480));
//! let render = simulator.render(&mask.view())?;
//! let image = to_gray_image(&render.frame.view());
//! # Ok::<(), PhospheneError>(())
//! ```
//!
//! ## Feature Flags
//!
//! - **`file-logging`**: daily rotated log files from the observability crate
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: phosphene-config, phosphene-observability  │
//! │  (TOML + env + CLI configuration, tracing setup)        │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Algorithms: phosphene-engine                           │
//! │  (grid, dilation, blur, edge thinning, frame pipeline)  │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Tools: phosphene_render                                │
//! │  (image file in, PNG out)                               │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

pub use phosphene_config as config;
pub use phosphene_engine as engine;
pub use phosphene_observability as observability;

pub use ndarray;

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::engine::{
        activation_mask_from_gray, build_grid, detect_edges, thin, to_gray_image, DualResolutionSimulator,
        FrameSize, GridResolution, HysteresisThresholds, PhospheneError, PhospheneGrid, PhospheneRender,
        PhospheneResult, PhospheneSimulator, PipelineParameters, SimulationMode, SimulatorParameters,
    };

    pub use crate::config::{load_config, validate_config, PhospheneConfig};

    pub use ndarray::{Array2, ArrayView2};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_exposes_pipeline() {
        let params = PipelineParameters::from_config(&PhospheneConfig::default()).unwrap();
        assert_eq!(params.initial_mode, SimulationMode::Raw);
        assert_eq!(params.processing_size, FrameSize::new(480, 480).unwrap());
    }
}
