// src/rng.rs
//! Random Number Generation for Monte Carlo Estimation
//!
//! # Design
//!
//! Monte Carlo estimates must be reproducible:
//! 1. **Reproducibility**: Same seed → same samples
//! 2. **Parallel safety**: Every sample element gets an independent stream
//! 3. **Thread-count independence**: Element `i` always sees the stream
//!    seeded with `base_seed + i`, no matter which worker draws it
//!
//! Streams are `StdRng` instances; distributions are drawn through `rand_distr`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// RNG factory for reproducible parallel sampling
#[derive(Debug, Clone, Copy)]
pub struct RngFactory {
    base_seed: u64,
}

impl RngFactory {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    /// Create the stream for a specific sample element
    pub fn create_std_rng(&self, element_id: u64) -> StdRng {
        StdRng::seed_from_u64(self.base_seed.wrapping_add(element_id))
    }
}

pub fn get_normal_draw<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}
