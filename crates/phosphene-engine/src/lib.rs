// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# Phosphene Engine

Simulated prosthetic vision: activation masks (typically edge maps of camera
frames) are rendered as fields of Gaussian phosphenes.

- Grid construction: a jittered lattice of phosphene centers with per-phosphene
  intensity variation, built once per simulator
- Rendering: elliptical dilation of the mask, compositing with the grid, 11x11
  Gaussian blur
- Edge preprocessing: Sobel gradients, non-maximum suppression with a plateau
  tie-break, hysteresis thresholding
- A dual-resolution frame pipeline and 8-bit display conversion

## Example

```no_run
use ndarray::Array2;
use phosphene_engine::{PhospheneSimulator, SimulatorParameters};

let simulator = PhospheneSimulator::new(SimulatorParameters::default())?;
let mask = Array2::<f32>::zeros((480, 480));
let render = simulator.render(&mask.view())?;
assert!(render.frame.iter().all(|&v| v == 0.0));
# Ok::<(), phosphene_engine::PhospheneError>(())
```

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod blur;
mod border;
pub mod display;
pub mod edges;
pub mod error;
pub mod grid;
pub mod morphology;
pub mod pipeline;
pub mod rng;
pub mod simulator;
pub mod types;

pub use error::{PhospheneError, PhospheneResult};
pub use types::{FrameSize, GridResolution};

pub use grid::{build_grid, PhospheneGrid};
pub use simulator::{PhospheneRender, PhospheneSimulator, SimulatorParameters};

pub use blur::{gaussian_blur, GaussianKernel, BLUR_KERNEL_SIZE};
pub use morphology::{dilate, StructuringElement};

pub use edges::{
    detect_edges, hysteresis_threshold, non_maximum_suppression, sobel_gradients, thin, DirectionBin,
    HysteresisThresholds, SobelGradients, ThinnedEdges,
};

pub use display::{activation_mask_from_gray, gray_image_to_array, to_gray_image};
pub use pipeline::{DualResolutionSimulator, PipelineParameters, SimulationMode};
