// src/autodiff/dual.rs
//! Forward-mode dual numbers
//!
//! # Mathematical Framework
//!
//! A dual number carries a value and a tangent along one direction:
//! ```text
//! x = re + eps·ε,   ε² = 0
//! ```
//! Evaluating any smooth function on a dual number yields
//! ```text
//! f(re + eps·ε) = f(re) + f'(re)·eps·ε
//! ```
//! so the tangent of an estimator's output is its directional derivative
//! with respect to whatever input was seeded with `eps = 1`.
//!
//! # Stop-gradient
//!
//! `stop_gradient` zeroes the tangent and keeps the value. A zero tangent is
//! never multiplied by a local derivative, so functions evaluated at points
//! where their derivative is infinite (e.g. `ln(0)`) still produce a zero
//! tangent for constants instead of NaN.

use crate::math_utils;
use ndarray::ScalarOperand;
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Dual number `re + eps·ε`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dual {
    pub re: f64,
    pub eps: f64,
}

/// `eps · k`, treating a zero tangent as exact
#[inline]
fn scale(eps: f64, k: f64) -> f64 {
    if eps == 0.0 {
        0.0
    } else {
        eps * k
    }
}

impl Dual {
    pub fn new(re: f64, eps: f64) -> Self {
        Dual { re, eps }
    }

    /// A constant: zero tangent
    pub fn constant(re: f64) -> Self {
        Dual { re, eps: 0.0 }
    }

    /// The differentiation variable: unit tangent
    pub fn variable(re: f64) -> Self {
        Dual { re, eps: 1.0 }
    }

    #[inline]
    fn chain(self, value: f64, derivative: f64) -> Self {
        Dual {
            re: value,
            eps: scale(self.eps, derivative),
        }
    }

    pub fn exp(self) -> Self {
        let e = self.re.exp();
        self.chain(e, e)
    }

    pub fn ln(self) -> Self {
        self.chain(self.re.ln(), 1.0 / self.re)
    }

    pub fn sqrt(self) -> Self {
        let s = self.re.sqrt();
        self.chain(s, 0.5 / s)
    }

    pub fn powi(self, n: i32) -> Self {
        self.chain(self.re.powi(n), n as f64 * self.re.powi(n - 1))
    }

    pub fn ln_gamma(self) -> Self {
        self.chain(math_utils::ln_gamma(self.re), math_utils::digamma(self.re))
    }

    pub fn digamma(self) -> Self {
        self.chain(math_utils::digamma(self.re), math_utils::trigamma(self.re))
    }
}

impl fmt::Display for Dual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}ε", self.re, self.eps)
    }
}

impl From<f64> for Dual {
    fn from(re: f64) -> Self {
        Dual::constant(re)
    }
}

impl Add for Dual {
    type Output = Dual;
    fn add(self, rhs: Dual) -> Dual {
        Dual::new(self.re + rhs.re, self.eps + rhs.eps)
    }
}

impl Sub for Dual {
    type Output = Dual;
    fn sub(self, rhs: Dual) -> Dual {
        Dual::new(self.re - rhs.re, self.eps - rhs.eps)
    }
}

impl Mul for Dual {
    type Output = Dual;
    fn mul(self, rhs: Dual) -> Dual {
        Dual::new(
            self.re * rhs.re,
            scale(rhs.eps, self.re) + scale(self.eps, rhs.re),
        )
    }
}

impl Div for Dual {
    type Output = Dual;
    fn div(self, rhs: Dual) -> Dual {
        let re = self.re / rhs.re;
        // (a/b)' = (a' - (a/b)·b') / b
        Dual::new(re, scale(self.eps, 1.0 / rhs.re) - scale(rhs.eps, re / rhs.re))
    }
}

impl Neg for Dual {
    type Output = Dual;
    fn neg(self) -> Dual {
        Dual::new(-self.re, -self.eps)
    }
}

impl Zero for Dual {
    fn zero() -> Self {
        Dual::constant(0.0)
    }

    fn is_zero(&self) -> bool {
        self.re == 0.0 && self.eps == 0.0
    }
}

impl One for Dual {
    fn one() -> Self {
        Dual::constant(1.0)
    }
}

impl ScalarOperand for Dual {}
