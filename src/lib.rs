//! # monte-carlo: Monte Carlo Integration with Gradient Estimators
//!
//! A Rust library for Monte Carlo approximation of expectations `E_p[f(X)]`
//! whose results carry unbiased gradients, using either the
//! reparameterization trick or the score-gradient (REINFORCE) trick.
//!
//! ## Key Features
//!
//! - **Expectation estimation**: Averages over arbitrary sample axes with `ndarray`
//! - **Gradient estimators**: Reparameterized and score-gradient paths
//! - **Forward-mode autodiff**: `Dual` numbers flow through every estimator
//! - **Distributions**: Normal (reparameterized) and Gamma (not reparameterized)
//! - **Csiszar f-divergences**: KL in both directions and squared Hellinger
//! - **Reproducible sampling**: Per-element seeded streams, parallel with Rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use monte_carlo::distributions::{kl_normal_normal, Normal};
//! use monte_carlo::mc::{expectation, ExpectationConfig};
//! use monte_carlo::{Distribution, Dual, Scalar};
//! use ndarray::ArrayD;
//!
//! // p has a differentiable location, q is fixed
//! let p = Normal::new(Dual::variable(0.0), Dual::constant(1.0)).unwrap();
//! let q = Normal::new(Dual::constant(1.0), Dual::constant(2.0)).unwrap();
//!
//! let samples = p.sample(&[50_000], 42).unwrap();
//! let log_ratio = |x: &ArrayD<Dual>| x.mapv(|v| p.log_prob(v) - q.log_prob(v));
//!
//! let kl = expectation(log_ratio, &samples, None, &ExpectationConfig::default()).unwrap();
//! let kl = kl.iter().next().copied().unwrap();
//!
//! let exact = kl_normal_normal(&p, &q);
//! assert!((kl.value() - exact.value()).abs() < 0.02);
//! assert!((kl.tangent() - exact.tangent()).abs() < 0.02);
//! ```

// Module declarations
pub mod autodiff;
pub mod distributions;
pub mod error;
pub mod math_utils;
pub mod mc;
pub mod output;
pub mod rng;

// Re-export commonly used types for convenience
pub use autodiff::{Dual, Scalar};
pub use distributions::{Distribution, ReparameterizationType};
pub use error::{McError, McResult};
pub use mc::{expectation, ExpectationConfig};
