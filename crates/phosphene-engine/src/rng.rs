// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Random number sources for grid construction.

Phosphene placement variability is part of the simulated phenomenon, so the
default source is unseeded. Tests and reproducible runs pass a seed instead.
*/

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Get the unseeded RNG used when the caller does not inject one
pub fn get_rng() -> impl Rng {
    rand::thread_rng()
}

/// Seeded when `seed` is `Some`, entropy-seeded otherwise
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
