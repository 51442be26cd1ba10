// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Phosphene simulator: grid, dilation kernel and blur kernel fixed at
construction, then one stateless render call per frame.

```text
mask ──dilate(ellipse D)──▶ dilated ──× grid──▶ composite ──gaussian 11x11──▶ frame
```

`D = round(aperture * spacing_rows)` with half-to-even rounding. Output is
unnormalized; see [`crate::display`] for conversion to 8-bit images.
*/

use ndarray::{Array2, ArrayView2, Zip};
use phosphene_config::SimulatorConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::blur::{gaussian_blur, GaussianKernel, BLUR_KERNEL_SIZE};
use crate::error::{PhospheneError, PhospheneResult};
use crate::grid::PhospheneGrid;
use crate::morphology::{dilate, StructuringElement};
use crate::rng::get_rng;
use crate::types::{FrameSize, GridResolution};

/// Immutable parameter record for one simulator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulatorParameters {
    pub resolution: GridResolution,
    pub size: FrameSize,
    /// Positional randomization as a fraction of spacing, `[0, 1]`
    pub jitter: f32,
    /// Intensity randomization around 1.0, `[0, 2)`
    pub intensity_var: f32,
    /// Receptive field diameter as a fraction of spacing, `(0, 1]`
    pub aperture: f32,
    pub sigma: f32,
}

impl Default for SimulatorParameters {
    fn default() -> Self {
        Self {
            resolution: GridResolution { rows: 50, cols: 50 },
            size: FrameSize {
                height: 480,
                width: 480,
            },
            jitter: 0.35,
            intensity_var: 0.9,
            aperture: 0.66,
            sigma: 0.8,
        }
    }
}

impl SimulatorParameters {
    /// Convert the `[simulator]` configuration section
    pub fn from_config(config: &SimulatorConfig) -> PhospheneResult<Self> {
        let params = Self {
            resolution: GridResolution::try_from(config.resolution)?,
            size: FrameSize::try_from(config.size)?,
            jitter: config.jitter,
            intensity_var: config.intensity_var,
            aperture: config.aperture,
            sigma: config.sigma,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check every range; the first violation is reported
    pub fn validate(&self) -> PhospheneResult<()> {
        if self.resolution.rows == 0 || self.resolution.cols == 0 {
            return Err(PhospheneError::invalid(format!("resolution has zero area: {}", self.resolution)));
        }
        if self.size.height == 0 || self.size.width == 0 {
            return Err(PhospheneError::invalid(format!("size has zero area: {}", self.size)));
        }
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(PhospheneError::invalid(format!("sigma must be positive, got {}", self.sigma)));
        }
        if !(0.0..=1.0).contains(&self.jitter) {
            return Err(PhospheneError::invalid(format!(
                "jitter must be within [0, 1], got {}",
                self.jitter
            )));
        }
        if !(0.0..2.0).contains(&self.intensity_var) {
            return Err(PhospheneError::invalid(format!(
                "intensity_var must be within [0, 2), got {}",
                self.intensity_var
            )));
        }
        if !(self.aperture > 0.0 && self.aperture <= 1.0) {
            return Err(PhospheneError::invalid(format!(
                "aperture must be within (0, 1], got {}",
                self.aperture
            )));
        }
        if self.dilation_diameter() == 0 {
            return Err(PhospheneError::invalid(format!(
                "aperture {} with row spacing {:.3} gives a zero-diameter dilation kernel",
                self.aperture,
                self.spacing().0
            )));
        }
        Ok(())
    }

    /// `size / resolution`, per axis
    pub fn spacing(&self) -> (f64, f64) {
        self.size.spacing(&self.resolution)
    }

    /// Receptive field diameter in pixels, derived from the row spacing
    pub fn dilation_diameter(&self) -> usize {
        let diameter = (self.aperture as f64 * self.spacing().0).round_ties_even();
        if diameter.is_finite() && diameter > 0.0 {
            diameter as usize
        } else {
            0
        }
    }
}

/// Result of one render call
#[derive(Debug, Clone, PartialEq)]
pub struct PhospheneRender {
    /// Blurred composite, unnormalized
    pub frame: Array2<f32>,
    /// The activation mask after dilation, before compositing
    pub dilated_mask: Array2<f32>,
}

/// Renders activation masks onto a fixed phosphene grid
#[derive(Debug, Clone)]
pub struct PhospheneSimulator {
    grid: PhospheneGrid,
    dilation_kernel: StructuringElement,
    blur_kernel: GaussianKernel,
}

impl PhospheneSimulator {
    /// Construct with a grid drawn from the thread RNG
    pub fn new(params: SimulatorParameters) -> PhospheneResult<Self> {
        let mut rng = get_rng();
        Self::new_with_rng(params, &mut rng)
    }

    /// Construct with an injected random source, e.g. a seeded `StdRng`
    pub fn new_with_rng<R: Rng + ?Sized>(params: SimulatorParameters, rng: &mut R) -> PhospheneResult<Self> {
        params.validate()?;

        let grid = PhospheneGrid::build(
            params.resolution,
            params.size,
            params.jitter,
            params.intensity_var,
            rng,
        )?;
        let dilation_kernel = StructuringElement::ellipse(params.dilation_diameter())?;
        let blur_kernel = GaussianKernel::new(BLUR_KERNEL_SIZE, params.sigma)?;

        debug!(target: "phosphene-engine",
            "Phosphene simulator ready: {} on {}, {} phosphenes, aperture {}px, sigma {}",
            params.resolution, params.size, grid.active_count(), dilation_kernel.diameter(), params.sigma);

        Ok(Self {
            grid,
            dilation_kernel,
            blur_kernel,
        })
    }

    /// Construct from a precomputed grid and an aperture in pixels
    ///
    /// Resolution, jitter and intensity variation play no part; the frame
    /// size is the grid's shape.
    pub fn with_custom_grid(grid: Array2<f32>, aperture_px: usize, sigma: f32) -> PhospheneResult<Self> {
        let grid = PhospheneGrid::from_array(grid)?;
        let dilation_kernel = StructuringElement::ellipse(aperture_px)?;
        let blur_kernel = GaussianKernel::new(BLUR_KERNEL_SIZE, sigma)?;

        debug!(target: "phosphene-engine",
            "Phosphene simulator ready from custom grid {:?}, {} phosphenes, aperture {}px, sigma {}",
            grid.shape(), grid.active_count(), aperture_px, sigma);

        Ok(Self {
            grid,
            dilation_kernel,
            blur_kernel,
        })
    }

    pub fn grid(&self) -> &PhospheneGrid {
        &self.grid
    }

    pub fn dilation_kernel(&self) -> &StructuringElement {
        &self.dilation_kernel
    }

    pub fn blur_kernel(&self) -> &GaussianKernel {
        &self.blur_kernel
    }

    /// `(height, width)` of masks accepted and frames produced
    pub fn size(&self) -> (usize, usize) {
        self.grid.shape()
    }

    /// Dilate, composite with the grid, blur
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` when `mask` is not exactly [`Self::size`]; nothing is
    /// computed in that case.
    pub fn render(&self, mask: &ArrayView2<f32>) -> PhospheneResult<PhospheneRender> {
        PhospheneError::check_shape(self.size(), mask.dim())?;

        let dilated_mask = dilate(mask, &self.dilation_kernel);
        let composite = Zip::from(&dilated_mask)
            .and(self.grid.view())
            .map_collect(|&m, &g| m * g);
        let frame = gaussian_blur(&composite.view(), &self.blur_kernel);

        trace!(target: "phosphene-engine",
            "Rendered {:?} frame, {} active mask pixels after dilation",
            frame.dim(), dilated_mask.iter().filter(|&&v| v != 0.0).count());

        Ok(PhospheneRender { frame, dilated_mask })
    }
}
