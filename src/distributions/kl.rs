// src/distributions/kl.rs
//! Closed-form Kullback-Leibler divergences
//!
//! ```text
//! KL(p || q) = E_p[ln p(X) - ln q(X)]
//! ```
//!
//! These are the exact values Monte Carlo estimates are compared against.
//! They are generic over `Scalar`, so seeding a parameter with
//! `Dual::variable` yields the exact gradient as well.

use super::gamma::Gamma;
use super::normal::Normal;
use crate::autodiff::Scalar;

/// KL divergence between two normal distributions
///
/// # Formula
/// ```text
/// KL = ln(σq/σp) + (σp² + (μp - μq)²) / (2σq²) - ½
/// ```
pub fn kl_normal_normal<S: Scalar>(p: &Normal<S>, q: &Normal<S>) -> S {
    let half = S::from_f64(0.5);
    let diff = p.loc() - q.loc();
    (q.scale() / p.scale()).ln()
        + (p.scale() * p.scale() + diff * diff) / (S::from_f64(2.0) * q.scale() * q.scale())
        - half
}

/// KL divergence between two gamma distributions (concentration, rate)
///
/// # Formula
/// ```text
/// KL = (αp - αq) ψ(αp) - ln Γ(αp) + ln Γ(αq)
///      + αq (ln βp - ln βq) + αp (βq - βp) / βp
/// ```
pub fn kl_gamma_gamma<S: Scalar>(p: &Gamma<S>, q: &Gamma<S>) -> S {
    let (ap, bp) = (p.concentration(), p.rate());
    let (aq, bq) = (q.concentration(), q.rate());
    (ap - aq) * ap.digamma() - ap.ln_gamma()
        + aq.ln_gamma()
        + aq * (bp.ln() - bq.ln())
        + ap * (bq - bp) / bp
}
