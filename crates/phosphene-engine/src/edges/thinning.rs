// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Edge thinning: non-maximum suppression along the gradient, then hysteresis.

Directions are in image coordinates (rows grow downward), so a 45° gradient
points down and to the right and is compared against the `(-1, -1)` and
`(+1, +1)` neighbors.
*/

use ndarray::{Array2, ArrayView2};
use tracing::debug;

use super::hysteresis::{hysteresis_threshold, HysteresisThresholds};
use super::sobel::sobel_gradients;
use crate::error::{PhospheneError, PhospheneResult};

/// 0/1 map of thinned edges
pub type ThinnedEdges = Array2<f32>;

/// Gradient direction quantized to the four pixel axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectionBin {
    /// Around 0° and 180°
    Horizontal,
    /// Around 45° and 225°
    Diagonal,
    /// Around 90° and 270°
    Vertical,
    /// Around 135° and 315°
    AntiDiagonal,
}

impl DirectionBin {
    /// Bin a direction in degrees; opposite directions share a bin
    pub fn from_degrees(theta: f32) -> Self {
        let theta = theta.rem_euclid(180.0);
        if !(22.5..157.5).contains(&theta) {
            DirectionBin::Horizontal
        } else if theta < 67.5 {
            DirectionBin::Diagonal
        } else if theta < 112.5 {
            DirectionBin::Vertical
        } else {
            DirectionBin::AntiDiagonal
        }
    }

    /// `(dy, dx)` of the two neighbors along the gradient
    pub fn neighbor_offsets(self) -> [(isize, isize); 2] {
        match self {
            DirectionBin::Horizontal => [(0, -1), (0, 1)],
            DirectionBin::Diagonal => [(-1, -1), (1, 1)],
            DirectionBin::Vertical => [(-1, 0), (1, 0)],
            DirectionBin::AntiDiagonal => [(-1, 1), (1, -1)],
        }
    }
}

/// Keep each interior pixel whose strength is `>=` both neighbors along its
/// gradient direction
///
/// Equal neighbors do not suppress each other, so a plateau survives as a
/// band rather than vanishing. The one-pixel border is always zero.
pub fn non_maximum_suppression(
    strength: &ArrayView2<f32>,
    directions: &ArrayView2<f32>,
) -> PhospheneResult<Array2<f32>> {
    PhospheneError::check_shape(strength.dim(), directions.dim())?;

    let (height, width) = strength.dim();
    let mut output = Array2::<f32>::zeros((height, width));
    if height < 3 || width < 3 {
        return Ok(output);
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let value = strength[[y, x]];
            let bin = DirectionBin::from_degrees(directions[[y, x]]);
            let is_max = bin.neighbor_offsets().iter().all(|&(dy, dx)| {
                let ny = (y as isize + dy) as usize;
                let nx = (x as isize + dx) as usize;
                value >= strength[[ny, nx]]
            });
            if is_max {
                output[[y, x]] = value;
            }
        }
    }

    Ok(output)
}

/// Thin a precomputed edge-strength map into one-pixel edge lines
///
/// Directions come from the Sobel gradients of `image`. Without explicit
/// thresholds, `0.33 * max` and `0.85 * max` of the suppressed map are used.
///
/// # Errors
///
/// `ShapeMismatch` when `image` and `edge_strength` differ in shape.
pub fn thin(
    image: &ArrayView2<f32>,
    edge_strength: &ArrayView2<f32>,
    thresholds: Option<HysteresisThresholds>,
) -> PhospheneResult<ThinnedEdges> {
    PhospheneError::check_shape(image.dim(), edge_strength.dim())?;

    let directions = sobel_gradients(image).direction_degrees();
    let suppressed = non_maximum_suppression(edge_strength, &directions.view())?;
    let thresholds = thresholds.unwrap_or_else(|| HysteresisThresholds::adaptive(&suppressed.view()));
    let edges = hysteresis_threshold(&suppressed.view(), thresholds);

    debug!(target: "phosphene-engine",
        "Thinned {:?} map: {} ridge pixels, {} kept (low {:.3}, high {:.3})",
        edges.dim(),
        suppressed.iter().filter(|&&v| v > 0.0).count(),
        edges.iter().filter(|&&v| v > 0.0).count(),
        thresholds.low(),
        thresholds.high());

    Ok(edges)
}
