// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Phosphene grid construction.

A grid is an image-sized array that is zero everywhere except at phosphene
centers, where it holds that phosphene's intensity. Centers start on a
regular lattice (one per cell, at the cell middle) and are jittered by up to
`jitter * spacing` per axis. Intensities are drawn uniformly around 1.0.

Two phosphenes that round onto the same pixel are not separated: the later
one overwrites the earlier, so the non-zero count can drop below
`rows * cols` at high jitter.
*/

use ndarray::{Array2, ArrayView2};
use rand::Rng;
use tracing::{debug, warn};

use crate::error::{PhospheneError, PhospheneResult};
use crate::types::{FrameSize, GridResolution};

/// Fixed layout of phosphene intensities, immutable once built
#[derive(Debug, Clone, PartialEq)]
pub struct PhospheneGrid {
    intensities: Array2<f32>,
}

impl PhospheneGrid {
    /// Build a jittered regular grid
    ///
    /// Random draws per phosphene, in lattice row-major order: row deviation,
    /// column deviation, intensity.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` when `jitter` is outside `[0, 1]` or
    /// `intensity_var` is outside `[0, 2)` (which could produce non-positive
    /// intensities).
    pub fn build<R: Rng + ?Sized>(
        resolution: GridResolution,
        size: FrameSize,
        jitter: f32,
        intensity_var: f32,
        rng: &mut R,
    ) -> PhospheneResult<Self> {
        validate_randomization(jitter, intensity_var)?;

        let (height, width) = size.as_shape();
        let (row_spacing, col_spacing) = size.spacing(&resolution);
        let jitter = jitter as f64;
        let intensity_var = intensity_var as f64;

        let mut intensities = Array2::<f32>::zeros((height, width));

        for i in 0..resolution.rows {
            let row_center = i as f64 * row_spacing + 0.5 * row_spacing;
            for j in 0..resolution.cols {
                let col_center = j as f64 * col_spacing + 0.5 * col_spacing;

                let row_deviation = jitter * (2.0 * rng.gen::<f64>() - 1.0) * row_spacing;
                let col_deviation = jitter * (2.0 * rng.gen::<f64>() - 1.0) * col_spacing;
                let intensity = intensity_var * (rng.gen::<f64>() - 0.5) + 1.0;

                let row = round_and_clamp(row_center + row_deviation, height);
                let col = round_and_clamp(col_center + col_deviation, width);
                intensities[[row, col]] = intensity as f32;
            }
        }

        let grid = PhospheneGrid { intensities };
        let placed = grid.active_count();
        if placed < resolution.area() {
            warn!(target: "phosphene-engine",
                "{} of {} phosphenes collided after rounding and were overwritten",
                resolution.area() - placed, resolution.area());
        }
        debug!(target: "phosphene-engine", "Built {} phosphene grid on {}", resolution, size);
        Ok(grid)
    }

    /// Wrap a precomputed grid
    ///
    /// Values are used as-is; cells that are zero simply hold no phosphene.
    pub fn from_array(intensities: Array2<f32>) -> PhospheneResult<Self> {
        let (height, width) = intensities.dim();
        if height == 0 || width == 0 {
            return Err(PhospheneError::invalid(format!(
                "custom grid cannot be empty, got shape ({}, {})",
                height, width
            )));
        }
        if intensities.iter().any(|v| !v.is_finite()) {
            return Err(PhospheneError::invalid("custom grid contains non-finite values"));
        }
        Ok(PhospheneGrid { intensities })
    }

    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.intensities.view()
    }

    /// `(height, width)`
    pub fn shape(&self) -> (usize, usize) {
        self.intensities.dim()
    }

    /// Number of cells holding a phosphene
    pub fn active_count(&self) -> usize {
        self.intensities.iter().filter(|&&v| v != 0.0).count()
    }

    /// `(row, col)` of every phosphene in row-major order
    pub fn positions(&self) -> Vec<(usize, usize)> {
        self.intensities
            .indexed_iter()
            .filter(|(_, &v)| v != 0.0)
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn into_inner(self) -> Array2<f32> {
        self.intensities
    }
}

/// Build a jittered phosphene grid, see [`PhospheneGrid::build`]
pub fn build_grid<R: Rng + ?Sized>(
    resolution: GridResolution,
    size: FrameSize,
    jitter: f32,
    intensity_var: f32,
    rng: &mut R,
) -> PhospheneResult<PhospheneGrid> {
    PhospheneGrid::build(resolution, size, jitter, intensity_var, rng)
}

fn validate_randomization(jitter: f32, intensity_var: f32) -> PhospheneResult<()> {
    if !(0.0..=1.0).contains(&jitter) {
        return Err(PhospheneError::invalid(format!(
            "jitter must be within [0, 1], got {}",
            jitter
        )));
    }
    if !(0.0..2.0).contains(&intensity_var) {
        return Err(PhospheneError::invalid(format!(
            "intensity_var must be within [0, 2), got {}",
            intensity_var
        )));
    }
    Ok(())
}

/// Half-to-even rounding, then clamp into `[0, len - 1]`
#[inline]
fn round_and_clamp(value: f64, len: usize) -> usize {
    value.round_ties_even().clamp(0.0, (len - 1) as f64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn build(rows: u32, cols: u32, height: u32, width: u32, jitter: f32, var: f32, seed: u64) -> PhospheneGrid {
        let mut rng = StdRng::seed_from_u64(seed);
        build_grid(
            GridResolution::new(rows, cols).unwrap(),
            FrameSize::new(height, width).unwrap(),
            jitter,
            var,
            &mut rng,
        )
        .unwrap()
    }

    #[test]
    fn test_zero_jitter_sits_on_cell_centers() {
        let grid = build(4, 4, 40, 40, 0.0, 0.9, 1);
        let expected: Vec<(usize, usize)> = [5, 15, 25, 35]
            .iter()
            .flat_map(|&r| [5, 15, 25, 35].iter().map(move |&c| (r, c)))
            .collect();
        assert_eq!(grid.positions(), expected);
    }

    #[test]
    fn test_centers_use_per_axis_spacing() {
        let grid = build(2, 4, 20, 80, 0.0, 0.0, 3);
        assert_eq!(
            grid.positions(),
            vec![(5, 10), (5, 30), (5, 50), (5, 70), (15, 10), (15, 30), (15, 50), (15, 70)]
        );
    }

    #[test]
    fn test_intensities_stay_within_variation() {
        let var = 0.9;
        let grid = build(10, 10, 100, 100, 0.0, var, 11);
        for &v in grid.view().iter().filter(|&&v| v != 0.0) {
            assert!(v >= 1.0 - var / 2.0 - 1e-6 && v <= 1.0 + var / 2.0 + 1e-6, "intensity {}", v);
        }
    }

    #[test]
    fn test_zero_variation_gives_unit_intensity() {
        let grid = build(5, 5, 50, 50, 0.2, 0.0, 5);
        assert!(grid.view().iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn test_same_seed_same_grid() {
        assert_eq!(build(20, 20, 200, 200, 0.35, 0.9, 99), build(20, 20, 200, 200, 0.35, 0.9, 99));
        assert_ne!(build(20, 20, 200, 200, 0.35, 0.9, 99), build(20, 20, 200, 200, 0.35, 0.9, 100));
    }

    #[test]
    fn test_full_jitter_stays_in_bounds() {
        let grid = build(3, 3, 9, 9, 1.0, 0.5, 21);
        assert_eq!(grid.shape(), (9, 9));
        assert!(grid.active_count() >= 1);
        assert!(grid.active_count() <= 9);
    }

    #[test]
    fn test_collisions_overwrite() {
        // Nine phosphenes all round onto the single available pixel
        let grid = build(3, 3, 1, 1, 0.0, 0.0, 0);
        assert_eq!(grid.active_count(), 1);
        assert_eq!(grid.view()[[0, 0]], 1.0);
    }

    #[test]
    fn test_invalid_randomization_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let resolution = GridResolution::new(2, 2).unwrap();
        let size = FrameSize::new(10, 10).unwrap();
        assert!(build_grid(resolution, size, 1.5, 0.5, &mut rng).is_err());
        assert!(build_grid(resolution, size, 0.5, 2.0, &mut rng).is_err());
        assert!(build_grid(resolution, size, f32::NAN, 0.5, &mut rng).is_err());
    }

    #[test]
    fn test_custom_grid_validation() {
        assert!(PhospheneGrid::from_array(Array2::zeros((0, 4))).is_err());
        let mut values = Array2::zeros((3, 3));
        values[[1, 1]] = f32::INFINITY;
        assert!(PhospheneGrid::from_array(values).is_err());
        let mut values = Array2::zeros((3, 3));
        values[[1, 1]] = 2.0;
        assert_eq!(PhospheneGrid::from_array(values).unwrap().positions(), vec![(1, 1)]);
    }
}
