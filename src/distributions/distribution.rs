// src/distributions/distribution.rs
use crate::autodiff::Scalar;
use crate::error::{McError, McResult};
use crate::rng::RngFactory;
use ndarray::{ArrayD, IxDyn};
use rand::Rng;
use rayon::prelude::*;

/// Whether samples carry the gradient of the distribution parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReparameterizationType {
    /// Samples are a differentiable transform of parameter-free noise
    FullyReparameterized,
    /// Samples are constants with respect to the parameters
    NotReparameterized,
}

impl ReparameterizationType {
    pub fn is_fully_reparameterized(self) -> bool {
        matches!(self, ReparameterizationType::FullyReparameterized)
    }
}

/// A scalar probability distribution whose parameters live in `S`
pub trait Distribution<S: Scalar>: Sync {
    fn name(&self) -> &'static str;

    fn reparameterization_type(&self) -> ReparameterizationType;

    /// Draw one sample
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> S;

    /// Natural log of the density at `x`
    fn log_prob(&self, x: S) -> S;

    /// Draw an array of samples with the given shape
    ///
    /// Element `i` (in row-major order) is drawn from the stream seeded with
    /// `seed + i`, so results do not depend on the rayon thread count.
    fn sample(&self, sample_shape: &[usize], seed: u64) -> McResult<ArrayD<S>> {
        let factory = RngFactory::new(seed);
        let count: usize = sample_shape.iter().product();

        let draws: Vec<S> = (0..count)
            .into_par_iter()
            .map(|i| {
                let mut rng = factory.create_std_rng(i as u64);
                self.draw(&mut rng)
            })
            .collect();

        ArrayD::from_shape_vec(IxDyn(sample_shape), draws).map_err(|e| {
            McError::InvalidConfiguration {
                field: "sample_shape".to_string(),
                reason: e.to_string(),
            }
        })
    }

    /// Elementwise `log_prob`
    fn log_prob_array(&self, x: &ArrayD<S>) -> ArrayD<S> {
        x.mapv(|v| self.log_prob(v))
    }
}
