// src/distributions/mod.rs
pub mod distribution;
pub mod gamma;
pub mod kl;
pub mod normal;

pub use distribution::{Distribution, ReparameterizationType};
pub use gamma::Gamma;
pub use kl::{kl_gamma_gamma, kl_normal_normal};
pub use normal::Normal;
