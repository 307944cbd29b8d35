// demos/kl_divergence.rs
//! Monte Carlo KL divergence between two normals, with gradients.
//!
//! Run with `cargo run --example kl_divergence`.

use monte_carlo::distributions::{kl_normal_normal, Normal};
use monte_carlo::mc::{
    expectation, get_samples, monte_carlo_csiszar_f_divergence, CsiszarFunction,
    ExpectationConfig,
};
use monte_carlo::output::{write_estimates_to_csv, write_summary_to_csv};
use monte_carlo::{Distribution, Dual, Scalar};
use ndarray::ArrayD;
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("Monte Carlo KL(N(0,1) || N(1,2))");
    println!("================================\n");

    let p = Normal::new(Dual::variable(0.0), Dual::constant(1.0))?;
    let q = Normal::new(Dual::constant(1.0), Dual::constant(2.0))?;
    let exact = kl_normal_normal(&p, &q);
    println!("Exact: value {:.6}, d/dloc {:.6}\n", exact.value(), exact.tangent());

    let log_ratio = |x: &ArrayD<Dual>| x.mapv(|v| p.log_prob(v) - q.log_prob(v));
    let config = ExpectationConfig::default();

    let mut rows = Vec::new();
    println!("{:>10} {:>12} {:>12}", "Draws", "Estimate", "Gradient");
    for &num_draws in &[100, 1_000, 10_000, 100_000] {
        let samples = get_samples(&p, None, Some(num_draws), 42)?;
        let estimate = expectation(log_ratio, &samples, None, &config)?;
        let kl = estimate.iter().next().copied().unwrap_or_default();
        println!("{:>10} {:>12.6} {:>12.6}", num_draws, kl.value(), kl.tangent());
        rows.push((num_draws, kl.value(), kl.tangent()));
    }

    // Same quantity through the Csiszar reverse-KL function with roles swapped
    let p_plain = Normal::new(0.0, 1.0)?;
    let q_plain = Normal::new(1.0, 2.0)?;
    let csiszar = monte_carlo_csiszar_f_divergence(
        CsiszarFunction::KlReverse,
        |x| q_plain.log_prob(x),
        &p_plain,
        100_000,
        42,
    )?;
    println!("\nCsiszar KL reverse estimate: {:.6}", csiszar);

    fs::create_dir_all("results")?;
    write_estimates_to_csv("results/kl_convergence.csv", &rows)?;
    let exact_value = format!("{:.8}", exact.value());
    let csiszar_value = format!("{:.8}", csiszar);
    write_summary_to_csv(
        "results/kl_summary.csv",
        &[("exact", exact_value.as_str()), ("csiszar", csiszar_value.as_str())],
    )?;
    println!("Results written to results/");

    Ok(())
}
