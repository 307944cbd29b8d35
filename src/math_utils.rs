// src/math_utils.rs
use statrs::function::gamma;

/// ln(sqrt(2π)), the normalizer of the standard normal log-density
pub const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_8;

pub fn ln_gamma(x: f64) -> f64 {
    gamma::ln_gamma(x)
}

pub fn digamma(x: f64) -> f64 {
    gamma::digamma(x)
}

/// Trigamma function ψ₁(x), the derivative of digamma
///
/// # Algorithm
///
/// Shifts the argument with the recurrence
/// ```text
/// ψ₁(x) = ψ₁(x + 1) + 1/x²
/// ```
/// until x ≥ 10, then applies the asymptotic series
/// ```text
/// ψ₁(x) ≈ 1/x + 1/(2x²) + 1/(6x³) - 1/(30x⁵) + 1/(42x⁷) - 1/(30x⁹) + 5/(66x¹¹)
/// ```
/// whose truncation error at x = 10 is below 1e-12.
pub fn trigamma(x: f64) -> f64 {
    if x.is_nan() || x == f64::NEG_INFINITY {
        return f64::NAN;
    }
    if x <= 0.0 && x.fract() == 0.0 {
        return f64::INFINITY;
    }
    if x < 0.0 {
        // Reflection: ψ₁(1 - x) + ψ₁(x) = π² / sin²(πx)
        let s = (std::f64::consts::PI * x).sin();
        return -trigamma(1.0 - x) + std::f64::consts::PI.powi(2) / (s * s);
    }

    let mut x = x;
    let mut acc = 0.0;
    while x < 10.0 {
        acc += 1.0 / (x * x);
        x += 1.0;
    }

    let inv = 1.0 / x;
    let inv2 = inv * inv;
    acc + inv
        + 0.5 * inv2
        + inv
            * inv2
            * (1.0 / 6.0
                - inv2 * (1.0 / 30.0 - inv2 * (1.0 / 42.0 - inv2 * (1.0 / 30.0 - inv2 * 5.0 / 66.0))))
}

pub struct Timer {
    start_time: std::time::Instant,
}

impl Timer {
    pub fn new() -> Timer {
        Timer {
            start_time: std::time::Instant::now(),
        }
    }

    pub fn start(&mut self) {
        self.start_time = std::time::Instant::now();
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigamma_known_values() {
        // ψ₁(1) = π²/6, ψ₁(1/2) = π²/2
        let pi2 = std::f64::consts::PI.powi(2);
        assert!((trigamma(1.0) - pi2 / 6.0).abs() < 1e-10);
        assert!((trigamma(0.5) - pi2 / 2.0).abs() < 1e-10);
        assert!(trigamma(0.0).is_infinite());
    }

    #[test]
    fn test_trigamma_precision_across_recurrence_boundary() {
        // ψ₁(n) = π²/6 - Σ_{k<n} 1/k²
        let pi2 = std::f64::consts::PI.powi(2);
        let mut exact = pi2 / 6.0;
        for n in 1..=15 {
            let x = n as f64;
            assert!(
                (trigamma(x) - exact).abs() < 1e-11,
                "trigamma({}) = {}, exact {}",
                x,
                trigamma(x),
                exact
            );
            exact -= 1.0 / (x * x);
        }
        // ψ₁(3/2) = π²/2 - 4
        assert!((trigamma(1.5) - (pi2 / 2.0 - 4.0)).abs() < 1e-11);
    }

    #[test]
    fn test_trigamma_matches_digamma_slope() {
        for &x in &[0.3, 1.7, 4.2, 12.5] {
            let h = 1e-5;
            let fd = (digamma(x + h) - digamma(x - h)) / (2.0 * h);
            assert!(
                (trigamma(x) - fd).abs() < 1e-5 * trigamma(x).max(1.0),
                "trigamma({}) = {}, finite difference = {}",
                x,
                trigamma(x),
                fd
            );
        }
    }

    #[test]
    fn test_ln_sqrt_2pi() {
        assert!((LN_SQRT_2PI - (2.0 * std::f64::consts::PI).sqrt().ln()).abs() < 1e-15);
    }
}
