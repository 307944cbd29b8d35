// src/error.rs

/// Error type for Monte Carlo estimation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum McError {
    /// Invalid parameter values
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// Score-gradient estimation was requested without a log-density
    #[error("`log_prob` must be provided when `use_reparametrization` is false")]
    MissingLogProb,

    /// Reduction axis out of range or repeated
    #[error("Invalid axis {axis} for array of rank {ndim}: {reason}")]
    InvalidAxis {
        axis: isize,
        ndim: usize,
        reason: String,
    },

    /// Two arrays that must agree elementwise have different shapes
    #[error("Shape mismatch in {context}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        context: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// Neither or both of a draw count and pre-drawn samples were given
    #[error(
        "Must specify exactly one of arguments \"n\" and \"z\". Found: n given = {n_given}, z given = {z_given}"
    )]
    SampleSourceConflict { n_given: bool, z_given: bool },

    /// Numerical instability or non-finite estimate
    #[error("Numerical instability in {method}: {reason}")]
    NumericalInstability { method: String, reason: String },

    /// Configuration text could not be parsed
    #[error("Failed to parse configuration: {reason}")]
    ConfigParse { reason: String },
}

/// Result type alias for monte-carlo operations
pub type McResult<T> = Result<T, McError>;

/// Validation utilities
pub mod validation {
    use super::{McError, McResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> McResult<()> {
        if value > 0.0 {
            Ok(())
        } else {
            Err(McError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> McResult<()> {
        if !value.is_finite() {
            Err(McError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate a number of Monte Carlo draws
    pub fn validate_num_draws(num_draws: usize) -> McResult<()> {
        if num_draws == 0 {
            Err(McError::InvalidConfiguration {
                field: "num_draws".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if num_draws > 1_000_000_000 {
            Err(McError::InvalidConfiguration {
                field: "num_draws".to_string(),
                reason: "exceeds maximum allowed (1 billion)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Resolve a possibly negative axis against an array rank
    pub fn normalize_axis(axis: isize, ndim: usize) -> McResult<usize> {
        let rank = ndim as isize;
        let resolved = if axis < 0 { axis + rank } else { axis };
        if resolved < 0 || resolved >= rank {
            return Err(McError::InvalidAxis {
                axis,
                ndim,
                reason: format!("must be in range [{}, {})", -rank, rank),
            });
        }
        Ok(resolved as usize)
    }

    /// Validate that two shapes agree
    pub fn validate_same_shape(context: &str, expected: &[usize], found: &[usize]) -> McResult<()> {
        if expected != found {
            return Err(McError::ShapeMismatch {
                context: context.to_string(),
                expected: expected.to_vec(),
                found: found.to_vec(),
            });
        }
        Ok(())
    }
}
