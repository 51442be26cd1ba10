// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Two-threshold edge tracking.

use std::collections::VecDeque;

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{PhospheneError, PhospheneResult};

/// Fraction of the maximum used as the low threshold when none is given
pub const ADAPTIVE_LOW_RATIO: f32 = 0.33;
/// Fraction of the maximum used as the high threshold when none is given
pub const ADAPTIVE_HIGH_RATIO: f32 = 0.85;

/// `low <= high`, both non-negative
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HysteresisThresholds {
    low: f32,
    high: f32,
}

impl Default for HysteresisThresholds {
    /// 35 / 70, suited to 8-bit images and L1 Sobel magnitudes
    fn default() -> Self {
        Self {
            low: 35.0,
            high: 70.0,
        }
    }
}

impl HysteresisThresholds {
    pub fn new(low: f32, high: f32) -> PhospheneResult<Self> {
        if !(low.is_finite() && high.is_finite()) || low < 0.0 || low > high {
            return Err(PhospheneError::invalid(format!(
                "hysteresis thresholds must satisfy 0 <= low <= high, got low={} high={}",
                low, high
            )));
        }
        Ok(Self { low, high })
    }

    /// Derived from the strongest response in `strength`
    pub fn adaptive(strength: &ArrayView2<f32>) -> Self {
        let max = strength.iter().copied().fold(0.0f32, f32::max);
        Self {
            low: ADAPTIVE_LOW_RATIO * max,
            high: ADAPTIVE_HIGH_RATIO * max,
        }
    }

    pub fn low(&self) -> f32 {
        self.low
    }

    pub fn high(&self) -> f32 {
        self.high
    }
}

/// Keep strong pixels (`> high`) and every weak pixel (`> low`) that is
/// 8-connected to one, directly or through other weak pixels.
///
/// Returns a 0/1 map.
pub fn hysteresis_threshold(strength: &ArrayView2<f32>, thresholds: HysteresisThresholds) -> Array2<f32> {
    let (height, width) = strength.dim();
    let mut output = Array2::<f32>::zeros((height, width));
    let mut queue = VecDeque::new();

    for ((y, x), &v) in strength.indexed_iter() {
        if v > thresholds.high {
            output[[y, x]] = 1.0;
            queue.push_back((y, x));
        }
    }

    while let Some((y, x)) = queue.pop_front() {
        for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                if output[[ny, nx]] == 0.0 && strength[[ny, nx]] > thresholds.low {
                    output[[ny, nx]] = 1.0;
                    queue.push_back((ny, nx));
                }
            }
        }
    }

    output
}
