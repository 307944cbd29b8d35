// src/autodiff/mod.rs
pub mod dual;
pub mod scalar;

pub use dual::Dual;
pub use scalar::Scalar;
