// src/autodiff/scalar.rs
use super::dual::Dual;
use crate::math_utils;
use ndarray::ScalarOperand;
use num_traits::{One, Zero};
use std::fmt::Debug;
use std::ops::{Div, Neg, Sub};

/// Element type of every estimator in this crate
///
/// `f64` yields plain estimates. `Dual` yields an estimate plus its
/// directional derivative, which is how reparameterization and
/// score-gradient estimators are told apart.
pub trait Scalar:
    Copy
    + Debug
    + Send
    + Sync
    + Zero
    + One
    + Neg<Output = Self>
    + Sub<Output = Self>
    + Div<Output = Self>
    + ScalarOperand
{
    fn from_f64(v: f64) -> Self;

    /// Primal value
    fn value(self) -> f64;

    /// Directional derivative carried by this element
    fn tangent(self) -> f64;

    /// Same value, no derivative
    fn stop_gradient(self) -> Self;

    fn exp(self) -> Self;
    fn ln(self) -> Self;
    fn sqrt(self) -> Self;
    fn powi(self, n: i32) -> Self;
    fn ln_gamma(self) -> Self;
    fn digamma(self) -> Self;

    fn is_finite(self) -> bool {
        self.value().is_finite()
    }
}

impl Scalar for f64 {
    fn from_f64(v: f64) -> Self {
        v
    }

    fn value(self) -> f64 {
        self
    }

    fn tangent(self) -> f64 {
        0.0
    }

    fn stop_gradient(self) -> Self {
        self
    }

    fn exp(self) -> Self {
        f64::exp(self)
    }

    fn ln(self) -> Self {
        f64::ln(self)
    }

    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }

    fn powi(self, n: i32) -> Self {
        f64::powi(self, n)
    }

    fn ln_gamma(self) -> Self {
        math_utils::ln_gamma(self)
    }

    fn digamma(self) -> Self {
        math_utils::digamma(self)
    }
}

impl Scalar for Dual {
    fn from_f64(v: f64) -> Self {
        Dual::constant(v)
    }

    fn value(self) -> f64 {
        self.re
    }

    fn tangent(self) -> f64 {
        self.eps
    }

    fn stop_gradient(self) -> Self {
        Dual::constant(self.re)
    }

    fn exp(self) -> Self {
        Dual::exp(self)
    }

    fn ln(self) -> Self {
        Dual::ln(self)
    }

    fn sqrt(self) -> Self {
        Dual::sqrt(self)
    }

    fn powi(self, n: i32) -> Self {
        Dual::powi(self, n)
    }

    fn ln_gamma(self) -> Self {
        Dual::ln_gamma(self)
    }

    fn digamma(self) -> Self {
        Dual::digamma(self)
    }
}
