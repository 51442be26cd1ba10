// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! 3x3 Sobel gradients.

use ndarray::{Array2, ArrayView2, Zip};

use crate::border::reflect_101;

/// Horizontal and vertical derivatives of an image
#[derive(Debug, Clone, PartialEq)]
pub struct SobelGradients {
    /// d/dx, positive where intensity rises to the right
    pub gx: Array2<f32>,
    /// d/dy, positive where intensity rises downward
    pub gy: Array2<f32>,
}

impl SobelGradients {
    /// L1 magnitude `|gx| + |gy|`
    pub fn magnitude(&self) -> Array2<f32> {
        Zip::from(&self.gx)
            .and(&self.gy)
            .map_collect(|gx, gy| gx.abs() + gy.abs())
    }

    /// Gradient direction in degrees, normalized into `[0, 360)`
    pub fn direction_degrees(&self) -> Array2<f32> {
        Zip::from(&self.gx)
            .and(&self.gy)
            .map_collect(|&gx, &gy| normalize_degrees(gy.atan2(gx).to_degrees()))
    }
}

fn normalize_degrees(theta: f32) -> f32 {
    let theta = if theta < 0.0 { theta + 360.0 } else { theta };
    // -0.0 and tiny negatives can round up to exactly 360
    if theta >= 360.0 {
        0.0
    } else {
        theta
    }
}

const SOBEL_X: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Sobel derivatives with reflect-101 borders
pub fn sobel_gradients(image: &ArrayView2<f32>) -> SobelGradients {
    let (height, width) = image.dim();
    let mut gx = Array2::<f32>::zeros((height, width));
    let mut gy = Array2::<f32>::zeros((height, width));

    for y in 0..height {
        for x in 0..width {
            let mut sx = 0.0;
            let mut sy = 0.0;
            for (ky, (row_x, row_y)) in SOBEL_X.iter().zip(SOBEL_Y.iter()).enumerate() {
                let iy = reflect_101(y as isize + ky as isize - 1, height);
                for kx in 0..3 {
                    let ix = reflect_101(x as isize + kx as isize - 1, width);
                    let v = image[[iy, ix]];
                    sx += row_x[kx] * v;
                    sy += row_y[kx] * v;
                }
            }
            gx[[y, x]] = sx;
            gy[[y, x]] = sy;
        }
    }

    SobelGradients { gx, gy }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_step() {
        let mut image = Array2::<f32>::zeros((5, 6));
        for y in 0..5 {
            for x in 3..6 {
                image[[y, x]] = 1.0;
            }
        }
        let grads = sobel_gradients(&image.view());
        assert_eq!(grads.gx[[2, 2]], 4.0);
        assert_eq!(grads.gx[[2, 3]], 4.0);
        assert_eq!(grads.gx[[2, 0]], 0.0);
        assert!(grads.gy.iter().all(|&v| v == 0.0));
        assert_eq!(grads.magnitude()[[2, 2]], 4.0);
        assert_eq!(grads.direction_degrees()[[2, 2]], 0.0);
    }

    #[test]
    fn test_direction_range() {
        let mut image = Array2::<f32>::zeros((5, 5));
        image[[0, 0]] = 9.0;
        let grads = sobel_gradients(&image.view());
        assert!(grads.direction_degrees().iter().all(|&t| (0.0..360.0).contains(&t)));
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(-1e-6), 0.0);
    }
}
