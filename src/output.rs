// src/output.rs
use std::fs::File;
use std::io::{self, Write};

/// One row of a convergence table: draw count, estimate, gradient estimate
pub type EstimateRow = (usize, f64, f64);

pub fn write_estimates_to_csv(filename: &str, rows: &[EstimateRow]) -> io::Result<()> {
    let mut file = File::create(filename)?;
    writeln!(file, "num_draws,estimate,gradient")?;
    for (num_draws, estimate, gradient) in rows {
        writeln!(file, "{},{},{}", num_draws, estimate, gradient)?;
    }
    Ok(())
}

pub fn write_summary_to_csv(filename: &str, summary_data: &[(&str, &str)]) -> io::Result<()> {
    let mut file = File::create(filename)?;
    for (key, value) in summary_data {
        writeln!(file, "{},{}", key, value)?;
    }
    Ok(())
}
