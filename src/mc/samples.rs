// src/mc/samples.rs
use crate::autodiff::Scalar;
use crate::distributions::Distribution;
use crate::error::{McError, McResult};
use ndarray::ArrayD;
use tracing::trace;

/// Where the samples of an estimate come from
#[derive(Debug, Clone)]
pub enum SampleSource<S: Scalar> {
    /// Draw `n` samples from the distribution with `seed`
    Draw { n: usize, seed: u64 },
    /// Use these pre-drawn samples
    Provided(ArrayD<S>),
}

impl<S: Scalar> SampleSource<S> {
    /// Build a source from optional arguments; exactly one must be given
    pub fn from_options(z: Option<ArrayD<S>>, n: Option<usize>, seed: u64) -> McResult<Self> {
        match (n, z) {
            (Some(n), None) => Ok(SampleSource::Draw { n, seed }),
            (None, Some(z)) => Ok(SampleSource::Provided(z)),
            (n, z) => Err(McError::SampleSourceConflict {
                n_given: n.is_some(),
                z_given: z.is_some(),
            }),
        }
    }

    /// Materialize the samples, drawing from `dist` if needed
    pub fn into_samples<D: Distribution<S>>(self, dist: &D) -> McResult<ArrayD<S>> {
        match self {
            SampleSource::Draw { n, seed } => {
                trace!(distribution = dist.name(), n, seed, "drawing samples");
                dist.sample(&[n], seed)
            }
            SampleSource::Provided(z) => Ok(z),
        }
    }
}

/// Check args and return samples
///
/// Exactly one of `n` and `z` must be given: with `n`, returns `n` draws from
/// `dist` with shape `[n]` (empty when `n == 0`); with `z`, returns `z` as is.
pub fn get_samples<S: Scalar, D: Distribution<S>>(
    dist: &D,
    z: Option<ArrayD<S>>,
    n: Option<usize>,
    seed: u64,
) -> McResult<ArrayD<S>> {
    SampleSource::from_options(z, n, seed)?.into_samples(dist)
}
