// src/distributions/normal.rs
//! Normal distribution
//!
//! # Reparameterization
//!
//! Samples are drawn as
//! ```text
//! X = μ + σ·Z,   Z ~ N(0,1)
//! ```
//! so a sample carries the derivative of μ and σ through the affine map.
//!
//! # Log-density
//! ```text
//! ln p(x) = -½((x - μ)/σ)² - ln σ - ln √(2π)
//! ```

use super::distribution::{Distribution, ReparameterizationType};
use crate::autodiff::Scalar;
use crate::error::{validation::*, McResult};
use crate::math_utils::LN_SQRT_2PI;
use crate::rng;
use rand::Rng;

#[derive(Debug, Clone, Copy)]
pub struct Normal<S: Scalar> {
    loc: S,
    scale: S,
}

impl<S: Scalar> Normal<S> {
    pub fn new(loc: S, scale: S) -> McResult<Self> {
        validate_finite("loc", loc.value())?;
        validate_finite("scale", scale.value())?;
        validate_positive("scale", scale.value())?;
        Ok(Normal { loc, scale })
    }

    pub fn loc(&self) -> S {
        self.loc
    }

    pub fn scale(&self) -> S {
        self.scale
    }
}

impl<S: Scalar> Distribution<S> for Normal<S> {
    fn name(&self) -> &'static str {
        "Normal"
    }

    fn reparameterization_type(&self) -> ReparameterizationType {
        ReparameterizationType::FullyReparameterized
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> S {
        let z = rng::get_normal_draw(rng);
        self.loc + self.scale * S::from_f64(z)
    }

    fn log_prob(&self, x: S) -> S {
        let z = (x - self.loc) / self.scale;
        -S::from_f64(0.5) * z * z - self.scale.ln() - S::from_f64(LN_SQRT_2PI)
    }
}
