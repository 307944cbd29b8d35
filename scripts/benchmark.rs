// scripts/benchmark.rs
use monte_carlo::distributions::{kl_gamma_gamma, kl_normal_normal, Gamma, Normal};
use monte_carlo::math_utils::Timer;
use monte_carlo::mc::{expectation, ExpectationConfig};
use monte_carlo::{Distribution, Dual, McResult, Scalar};
use ndarray::ArrayD;
use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::process::Command;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_cores: usize,
    rust_version: String,
    rustc_flags: String,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_cores: num_cpus::get(),
            rust_version: Command::new("rustc")
                .arg("--version")
                .output()
                .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
                .unwrap_or_else(|_| "Unknown Rust version".to_string()),
            rustc_flags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
            rayon_threads: rayon::current_num_threads(),
        }
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    name: String,
    draws: usize,
    time_ms: f64,
    throughput_draws_per_sec: f64,
    value: f64,
    gradient: f64,
    analytic_value: f64,
    analytic_gradient: f64,
}

impl BenchmarkResult {
    fn relative_error(&self) -> f64 {
        (self.value - self.analytic_value).abs() / self.analytic_value.abs()
    }
}

fn scalar_of(estimate: &ArrayD<Dual>) -> Dual {
    estimate.iter().next().copied().unwrap_or_default()
}

/// Time one KL(p ‖ q) estimate and compare it with the closed form
fn run_kl_benchmark<D>(
    name: &str,
    p: &D,
    q: &D,
    exact: Dual,
    draws: usize,
    config: &ExpectationConfig,
) -> McResult<BenchmarkResult>
where
    D: Distribution<Dual>,
{
    let mut timer = Timer::new();
    timer.start();

    let samples = p.sample(&[draws], 42)?;
    let log_ratio = |x: &ArrayD<Dual>| x.mapv(|v| p.log_prob(v) - q.log_prob(v));
    let log_prob = |x: &ArrayD<Dual>| p.log_prob_array(x);
    let estimate = scalar_of(&expectation(log_ratio, &samples, Some(&log_prob), config)?);

    let time_ms = timer.elapsed_ms();
    info!(benchmark = name, draws, time_ms, "benchmark finished");

    Ok(BenchmarkResult {
        name: format!("{} ({}k draws)", name, draws / 1000),
        draws,
        time_ms,
        throughput_draws_per_sec: draws as f64 / (time_ms / 1000.0),
        value: estimate.value(),
        gradient: estimate.tangent(),
        analytic_value: exact.value(),
        analytic_gradient: exact.tangent(),
    })
}

fn run_benchmarks() -> McResult<Vec<BenchmarkResult>> {
    let mut results = Vec::new();

    let normal_p = Normal::new(Dual::variable(0.0), Dual::constant(1.0))?;
    let normal_q = Normal::new(Dual::constant(1.0), Dual::constant(2.0))?;
    let normal_exact = kl_normal_normal(&normal_p, &normal_q);

    let gamma_p = Gamma::new(Dual::constant(1.0), Dual::variable(1.0))?;
    let gamma_q = Gamma::new(Dual::constant(2.0), Dual::constant(3.0))?;
    let gamma_exact = kl_gamma_gamma(&gamma_p, &gamma_q);

    let reparam = ExpectationConfig {
        name: Some("kl_normal_reparam".to_string()),
        ..Default::default()
    };
    let score = ExpectationConfig {
        use_reparametrization: false,
        name: Some("kl_gamma_score".to_string()),
        ..Default::default()
    };

    for &draws in &[10_000, 100_000, 1_000_000] {
        println!("Running benchmarks with {} draws...", draws);
        results.push(run_kl_benchmark(
            "KL Normal (reparameterized)",
            &normal_p,
            &normal_q,
            normal_exact,
            draws,
            &reparam,
        )?);
        results.push(run_kl_benchmark(
            "KL Gamma (score-gradient)",
            &gamma_p,
            &gamma_q,
            gamma_exact,
            draws,
            &score,
        )?);
    }

    Ok(results)
}

fn write_results_to_csv(
    results: &[BenchmarkResult],
    system_info: &SystemInfo,
    filename: &str,
) -> io::Result<()> {
    let mut file = File::create(filename)?;

    writeln!(file, "# System Information")?;
    writeln!(file, "# OS: {}", system_info.os)?;
    writeln!(file, "# CPU Cores: {}", system_info.cpu_cores)?;
    writeln!(file, "# Rust Version: {}", system_info.rust_version)?;
    writeln!(file, "# RUSTFLAGS: {}", system_info.rustc_flags)?;
    writeln!(file, "# Rayon Threads: {}", system_info.rayon_threads)?;
    writeln!(
        file,
        "# Benchmark Date: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(file, "#")?;

    writeln!(
        file,
        "Benchmark,Draws,Time_ms,Throughput_draws_per_sec,Value,Analytic_Value,Relative_Error,Gradient,Analytic_Gradient"
    )?;
    for result in results {
        writeln!(
            file,
            "{},{},{:.2},{:.0},{:.6},{:.6},{:.6},{:.6},{:.6}",
            result.name,
            result.draws,
            result.time_ms,
            result.throughput_draws_per_sec,
            result.value,
            result.analytic_value,
            result.relative_error(),
            result.gradient,
            result.analytic_gradient,
        )?;
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("monte-carlo Expectation Benchmark Suite");
    println!("=======================================\n");

    let system_info = SystemInfo::gather();
    println!("System Information:");
    println!("  OS: {}", system_info.os);
    println!("  CPU Cores: {}", system_info.cpu_cores);
    println!("  Rust Version: {}", system_info.rust_version);
    println!("  RUSTFLAGS: {}", system_info.rustc_flags);
    println!("  Rayon Threads: {}", system_info.rayon_threads);
    println!();

    let results = run_benchmarks()?;

    println!("\n{:=<96}", "");
    println!("BENCHMARK RESULTS");
    println!("{:=<96}", "");
    println!(
        "{:<42} {:>10} {:>14} {:>10} {:>10} {:>10} {:>10}",
        "Benchmark", "Time (ms)", "Throughput", "Value", "Analytic", "Gradient", "Rel Error"
    );
    println!("{:-<96}", "");
    for result in &results {
        println!(
            "{:<42} {:>10.2} {:>14.0} {:>10.4} {:>10.4} {:>10.4} {:>9.2}%",
            result.name,
            result.time_ms,
            result.throughput_draws_per_sec,
            result.value,
            result.analytic_value,
            result.gradient,
            result.relative_error() * 100.0
        );
    }
    println!("{:=<96}", "");

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let filename = format!("benchmark_results_{}.csv", timestamp);
    write_results_to_csv(&results, &system_info, &filename)?;

    println!("\nResults saved to: {}", filename);
    println!("Run with RUST_LOG=monte_carlo=debug to trace each estimate.");
    Ok(())
}
