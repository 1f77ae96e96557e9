//! Command-line argument parsing for the benchmark

use clap::Parser;

/// Orbital and local-energy benchmark driven by a YAML configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file (defaults are used if omitted)
    #[arg(short, long)]
    pub config_file: Option<String>,

    /// Override the structure document
    #[arg(short, long)]
    pub structure: Option<String>,

    /// Override the number of walkers
    #[arg(long)]
    pub walk_num: Option<usize>,

    /// Override the number of timed MO VGL evaluations
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Override the sampling seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the coordinate layout ("N" or "T")
    #[arg(long)]
    pub layout: Option<String>,

    /// Override output file: (default stdout)
    #[arg(short, long)]
    pub output: Option<String>,
}
