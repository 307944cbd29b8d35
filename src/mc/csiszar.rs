// src/mc/csiszar.rs
//! Monte Carlo Csiszar f-divergences
//!
//! # Mathematical Framework
//!
//! For a convex `f` with `f(1) = 0`, the Csiszar f-divergence is
//! ```text
//! D_f[p, q] = E_q[ f(p(X) / q(X)) ]
//! ```
//! Functions here take `logu = ln p(x) - ln q(x)` to stay in log space.
//!
//! | Variant            | f(u)              | Divergence  |
//! |--------------------|-------------------|-------------|
//! | `KlReverse`        | -ln u             | KL(q ‖ p)   |
//! | `KlForward`        | u ln u            | KL(p ‖ q)   |
//! | `SquaredHellinger` | (√u - 1)²         | 2·H²(p, q)  |

use crate::autodiff::Scalar;
use crate::distributions::Distribution;
use crate::error::{validation::validate_num_draws, McError, McResult};
use crate::mc::expectation::{expectation_under, ExpectationConfig};
use crate::mc::samples::SampleSource;
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsiszarFunction {
    KlReverse,
    KlForward,
    SquaredHellinger,
}

impl CsiszarFunction {
    /// Evaluate `f(u)` given `logu = ln u`
    pub fn apply<S: Scalar>(self, logu: S) -> S {
        match self {
            CsiszarFunction::KlReverse => -logu,
            CsiszarFunction::KlForward => logu.exp() * logu,
            CsiszarFunction::SquaredHellinger => {
                let r = (logu * S::from_f64(0.5)).exp() - S::one();
                r * r
            }
        }
    }
}

/// Monte Carlo estimate of `D_f[p, q] = E_q[f(p(X)/q(X))]`
///
/// Draws `num_draws` samples from `q`. When `q` is not fully reparameterized
/// the score-gradient estimator supplies the gradient.
///
/// # Example
///
/// ```
/// use monte_carlo::distributions::Normal;
/// use monte_carlo::mc::csiszar::{monte_carlo_csiszar_f_divergence, CsiszarFunction};
/// use monte_carlo::Distribution;
///
/// let p = Normal::new(0.0, 1.0).unwrap();
/// let q = Normal::new(1.0, 2.0).unwrap();
/// // KL(p ‖ q) via the reverse-KL function with the roles swapped
/// let kl = monte_carlo_csiszar_f_divergence(
///     CsiszarFunction::KlReverse,
///     |x| q.log_prob(x),
///     &p,
///     50_000,
///     42,
/// )
/// .unwrap();
/// assert!((kl - 0.443_147_18).abs() < 0.02);
/// ```
pub fn monte_carlo_csiszar_f_divergence<S, D, P>(
    f: CsiszarFunction,
    p_log_prob: P,
    q: &D,
    num_draws: usize,
    seed: u64,
) -> McResult<S>
where
    S: Scalar,
    D: Distribution<S>,
    P: Fn(S) -> S,
{
    validate_num_draws(num_draws)?;

    let config = ExpectationConfig {
        name: Some("csiszar_f_divergence".to_string()),
        ..Default::default()
    };
    let estimate = expectation_under(
        |x: &ArrayD<S>| x.mapv(|v| f.apply(p_log_prob(v) - q.log_prob(v))),
        q,
        SampleSource::Draw {
            n: num_draws,
            seed,
        },
        &config,
    )?;

    let value = estimate
        .iter()
        .next()
        .copied()
        .ok_or_else(|| McError::NumericalInstability {
            method: "Csiszar f-divergence".to_string(),
            reason: "estimate is empty".to_string(),
        })?;

    if !value.is_finite() {
        warn!(?f, num_draws, "non-finite divergence estimate");
        return Err(McError::NumericalInstability {
            method: "Csiszar f-divergence".to_string(),
            reason: format!("estimate is not finite: {}", value.value()),
        });
    }

    Ok(value)
}
