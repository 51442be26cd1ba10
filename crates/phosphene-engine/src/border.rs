// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Border extrapolation for neighborhood filters.

/// Maps an out-of-range index back into `0..len` by mirroring without
/// repeating the edge pixel (`gfedcb|abcdefgh|gfedcba`).
#[inline]
pub(crate) fn reflect_101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mut i = index;
    // Kernels wider than the image may need several reflections
    while i < 0 || i > last {
        if i < 0 {
            i = -i;
        }
        if i > last {
            i = 2 * last - i;
        }
    }
    i as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_101() {
        assert_eq!(reflect_101(-1, 8), 1);
        assert_eq!(reflect_101(-3, 8), 3);
        assert_eq!(reflect_101(8, 8), 6);
        assert_eq!(reflect_101(9, 8), 5);
        assert_eq!(reflect_101(4, 8), 4);
    }

    #[test]
    fn test_reflect_101_small_images() {
        assert_eq!(reflect_101(-5, 1), 0);
        assert_eq!(reflect_101(-1, 2), 1);
        assert_eq!(reflect_101(3, 2), 1);
        assert_eq!(reflect_101(-5, 3), 1);
    }
}
