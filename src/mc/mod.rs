// src/mc/mod.rs
pub mod csiszar;
pub mod expectation;
pub mod reduce;
pub mod samples;

pub use csiszar::{monte_carlo_csiszar_f_divergence, CsiszarFunction};
pub use expectation::{expectation, expectation_under, ExpectationConfig, LogProbFn};
pub use reduce::{reduce_max, reduce_mean, sample_max, sample_mean, Axes};
pub use samples::{get_samples, SampleSource};
