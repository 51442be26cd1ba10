// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Conversions between `ndarray` frames and 8-bit grayscale images.

use image::{GrayImage, Luma};
use ndarray::{Array2, ArrayView2};

/// Scale a rendered frame so its maximum maps to 255
///
/// Values are truncated, not rounded. A frame whose maximum is not positive
/// yields a black image.
pub fn to_gray_image(frame: &ArrayView2<f32>) -> GrayImage {
    let (height, width) = frame.dim();
    let max = frame.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let scale = if max.is_finite() && max > 0.0 { 255.0 / max } else { 0.0 };

    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        let v = frame[[y as usize, x as usize]] * scale;
        // `as` saturates: negatives become 0
        Luma([v as u8])
    })
}

/// Raw pixel values as `f32`, shape `(height, width)`
pub fn gray_image_to_array(image: &GrayImage) -> Array2<f32> {
    let (width, height) = image.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
        image.get_pixel(x as u32, y as u32)[0] as f32
    })
}

/// 1.0 wherever the image is non-zero, 0.0 elsewhere
pub fn activation_mask_from_gray(image: &GrayImage) -> Array2<f32> {
    gray_image_to_array(image).mapv(|v| if v > 0.0 { 1.0 } else { 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_max_maps_to_255() {
        let frame = array![[0.0, 0.5], [1.0, 2.0]];
        let image = to_gray_image(&frame.view());
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(1, 1)[0], 255);
        assert_eq!(image.get_pixel(0, 1)[0], 127);
        assert_eq!(image.get_pixel(1, 0)[0], 63);
        assert_eq!(image.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_blank_frame_stays_black() {
        let frame = Array2::<f32>::zeros((3, 4));
        let image = to_gray_image(&frame.view());
        assert_eq!(image.dimensions(), (4, 3));
        assert!(image.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_array_layout_is_row_major() {
        let mut image = GrayImage::new(3, 2);
        image.put_pixel(2, 0, Luma([200]));
        let array = gray_image_to_array(&image);
        assert_eq!(array.dim(), (2, 3));
        assert_eq!(array[[0, 2]], 200.0);

        let mask = activation_mask_from_gray(&image);
        assert_eq!(mask[[0, 2]], 1.0);
        assert_eq!(mask.sum(), 1.0);
    }
}
