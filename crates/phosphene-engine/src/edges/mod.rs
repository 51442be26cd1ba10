// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Edge preprocessing that turns grayscale frames into activation masks.

- [`sobel`]: 3x3 derivatives and magnitude
- [`thinning`]: non-maximum suppression and the [`thin`] entry point
- [`hysteresis`]: strong/weak threshold tracking

[`detect_edges`] chains them into a Canny-style detector whose output can be
passed straight to the renderer.
*/

pub mod hysteresis;
pub mod sobel;
pub mod thinning;

pub use hysteresis::{hysteresis_threshold, HysteresisThresholds};
pub use sobel::{sobel_gradients, SobelGradients};
pub use thinning::{non_maximum_suppression, thin, DirectionBin, ThinnedEdges};

use ndarray::{Array2, ArrayView2};

use crate::error::PhospheneResult;

/// Value written for edge pixels in a detected mask
pub const EDGE_VALUE: f32 = 255.0;

/// Sobel magnitude, thinning and hysteresis; edge pixels are 255, others 0
///
/// Thresholds apply to the L1 Sobel magnitude of `image`.
pub fn detect_edges(image: &ArrayView2<f32>, low: f32, high: f32) -> PhospheneResult<Array2<f32>> {
    let thresholds = HysteresisThresholds::new(low, high)?;
    let magnitude = sobel_gradients(image).magnitude();
    let edges = thin(image, &magnitude.view(), Some(thresholds))?;
    Ok(edges.mapv(|v| v * EDGE_VALUE))
}
