// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Dimension types shared by the grid builder, renderer and frame pipeline.

Both types are row-major: the first component indexes rows, matching the
`(height, width)` shape of the `ndarray` images used throughout the crate.
*/

use crate::error::{PhospheneError, PhospheneResult};
use serde::{Deserialize, Serialize};

/// Creates a 2D dimension type with two named non-zero fields.
macro_rules! define_row_major_dimensions {
    ($name:ident, $first:ident, $second:ident, $friendly_name:expr, $doc_string:expr) => {
        #[doc = $doc_string]
        #[derive(Clone, Debug, PartialEq, Copy, Hash, Eq, Serialize, Deserialize)]
        pub struct $name {
            pub $first: u32,
            pub $second: u32,
        }

        impl $name {
            pub fn new($first: u32, $second: u32) -> PhospheneResult<Self> {
                if $first == 0 || $second == 0 {
                    return Err(PhospheneError::invalid(format!(
                        "{} cannot have a zero dimension, got ({}, {})",
                        $friendly_name, $first, $second
                    )));
                }
                Ok(Self { $first, $second })
            }

            /// Number of cells covered
            pub fn area(&self) -> usize {
                self.$first as usize * self.$second as usize
            }

            /// `(first, second)` as an ndarray shape
            pub fn as_shape(&self) -> (usize, usize) {
                (self.$first as usize, self.$second as usize)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}<{}, {}>", $friendly_name, self.$first, self.$second)
            }
        }

        impl From<$name> for (u32, u32) {
            fn from(value: $name) -> Self {
                (value.$first, value.$second)
            }
        }

        impl TryFrom<(u32, u32)> for $name {
            type Error = PhospheneError;
            fn try_from(value: (u32, u32)) -> Result<Self, Self::Error> {
                $name::new(value.0, value.1)
            }
        }

        impl TryFrom<[u32; 2]> for $name {
            type Error = PhospheneError;
            fn try_from(value: [u32; 2]) -> Result<Self, Self::Error> {
                $name::new(value[0], value[1])
            }
        }
    };
}

define_row_major_dimensions!(
    GridResolution,
    rows,
    cols,
    "GridResolution",
    "Number of phosphenes along each axis (rows, cols)"
);

define_row_major_dimensions!(
    FrameSize,
    height,
    width,
    "FrameSize",
    "Size of a rendered frame in pixels (height, width)"
);

impl FrameSize {
    /// Phosphene spacing in pixels per axis, `size / resolution`
    pub fn spacing(&self, resolution: &GridResolution) -> (f64, f64) {
        (
            self.height as f64 / resolution.rows as f64,
            self.width as f64 / resolution.cols as f64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(GridResolution::new(0, 4).is_err());
        assert!(FrameSize::try_from((480, 0)).is_err());
    }

    #[test]
    fn test_spacing_is_elementwise() {
        let size: FrameSize = (480, 240).try_into().unwrap();
        let resolution: GridResolution = [48, 12].try_into().unwrap();
        assert_eq!(size.spacing(&resolution), (10.0, 20.0));
        assert_eq!(resolution.area(), 576);
        assert_eq!(size.as_shape(), (480, 240));
    }

    #[test]
    fn test_display() {
        let resolution = GridResolution::new(26, 26).unwrap();
        assert_eq!(resolution.to_string(), "GridResolution<26, 26>");
    }
}
