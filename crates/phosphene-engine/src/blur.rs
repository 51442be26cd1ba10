// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Separable Gaussian blur with a fixed kernel extent.

use ndarray::{Array2, ArrayView2};

use crate::border::reflect_101;
use crate::error::{PhospheneError, PhospheneResult};

/// Kernel extent used for rendering, independent of sigma
pub const BLUR_KERNEL_SIZE: usize = 11;

/// Normalized 1-D Gaussian weights, applied along both axes
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKernel {
    sigma: f32,
    weights: Vec<f32>,
}

impl GaussianKernel {
    /// # Errors
    ///
    /// `InvalidConfiguration` for an even or zero `size`, or a non-positive
    /// (or non-finite) `sigma`.
    pub fn new(size: usize, sigma: f32) -> PhospheneResult<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(PhospheneError::invalid(format!(
                "blur kernel size must be odd and positive, got {}",
                size
            )));
        }
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(PhospheneError::invalid(format!(
                "blur sigma must be positive, got {}",
                sigma
            )));
        }

        let half = (size / 2) as f64;
        let scale = -0.5 / (sigma as f64 * sigma as f64);
        let raw: Vec<f64> = (0..size)
            .map(|i| {
                let x = i as f64 - half;
                (scale * x * x).exp()
            })
            .collect();
        let sum: f64 = raw.iter().sum();
        let weights = raw.iter().map(|w| (w / sum) as f32).collect();

        Ok(GaussianKernel { sigma, weights })
    }

    pub fn size(&self) -> usize {
        self.weights.len()
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}

/// Blur rows then columns, extrapolating borders with reflect-101
pub fn gaussian_blur(image: &ArrayView2<f32>, kernel: &GaussianKernel) -> Array2<f32> {
    let (height, width) = image.dim();
    let half = (kernel.size() / 2) as isize;
    let weights = kernel.weights();

    let mut horizontal = Array2::<f32>::zeros((height, width));
    for ((y, x), out) in horizontal.indexed_iter_mut() {
        *out = weights
            .iter()
            .enumerate()
            .map(|(k, w)| w * image[[y, reflect_101(x as isize + k as isize - half, width)]])
            .sum();
    }

    let mut output = Array2::<f32>::zeros((height, width));
    for ((y, x), out) in output.indexed_iter_mut() {
        *out = weights
            .iter()
            .enumerate()
            .map(|(k, w)| w * horizontal[[reflect_101(y as isize + k as isize - half, height), x]])
            .sum();
    }

    output
}
