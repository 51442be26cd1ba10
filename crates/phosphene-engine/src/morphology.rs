// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Elliptical structuring elements and grayscale dilation.

The element follows the usual raster ellipse construction: for a `D x D`
element with semi-axes `r = c = D / 2`, row `i` covers the columns within
`round(c * sqrt(1 - (i - r)^2 / r^2))` of the center. The anchor sits at
`(D / 2, D / 2)`, so even diameters extend one pixel further up and left.
*/

use ndarray::{Array2, ArrayView2};

use crate::error::{PhospheneError, PhospheneResult};

/// Elliptical (here circular) structuring element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    diameter: usize,
    mask: Array2<bool>,
    /// `(dy, dx)` relative to the anchor for every set cell
    offsets: Vec<(isize, isize)>,
}

impl StructuringElement {
    /// Build an elliptical element of the given diameter in pixels
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` when `diameter` is zero.
    pub fn ellipse(diameter: usize) -> PhospheneResult<Self> {
        if diameter == 0 {
            return Err(PhospheneError::invalid(
                "dilation kernel diameter must be at least 1 pixel",
            ));
        }

        let r = (diameter / 2) as isize;
        let c = (diameter / 2) as f64;
        let inv_r2 = if r > 0 { 1.0 / (r * r) as f64 } else { 0.0 };

        let mut mask = Array2::from_elem((diameter, diameter), false);
        for i in 0..diameter {
            let dy = i as isize - r;
            if dy.abs() > r {
                continue;
            }
            let dx = (c * (((r * r - dy * dy) as f64) * inv_r2).sqrt()).round_ties_even() as isize;
            let start = (r - dx).max(0) as usize;
            let end = ((r + dx + 1) as usize).min(diameter);
            for j in start..end {
                mask[[i, j]] = true;
            }
        }

        let offsets = mask
            .indexed_iter()
            .filter(|(_, &set)| set)
            .map(|((i, j), _)| (i as isize - r, j as isize - r))
            .collect();

        Ok(StructuringElement {
            diameter,
            mask,
            offsets,
        })
    }

    pub fn diameter(&self) -> usize {
        self.diameter
    }

    /// `(row, col)` of the anchor inside the element
    pub fn anchor(&self) -> (usize, usize) {
        (self.diameter / 2, self.diameter / 2)
    }

    pub fn mask(&self) -> ArrayView2<'_, bool> {
        self.mask.view()
    }

    pub fn offsets(&self) -> &[(isize, isize)] {
        &self.offsets
    }
}

/// Grayscale dilation, one iteration
///
/// Each output pixel is the maximum of the input over the element placed at
/// that pixel. Positions falling outside the image are skipped rather than
/// padded.
pub fn dilate(image: &ArrayView2<f32>, element: &StructuringElement) -> Array2<f32> {
    let (height, width) = image.dim();
    let mut output = Array2::<f32>::zeros((height, width));

    for ((y, x), out) in output.indexed_iter_mut() {
        let mut best = f32::NEG_INFINITY;
        for &(dy, dx) in element.offsets() {
            let sy = y as isize + dy;
            let sx = x as isize + dx;
            if sy < 0 || sx < 0 || sy >= height as isize || sx >= width as isize {
                continue;
            }
            best = best.max(image[[sy as usize, sx as usize]]);
        }
        // The anchor is always part of the element, so `best` is finite here
        *out = best;
    }

    output
}
