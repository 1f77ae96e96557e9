//! Benchmark command-line interface
//!
//! Loads a structure, samples walkers, times the MO VGL evaluation and
//! reports local energies, driven by a YAML configuration.

use color_eyre::eyre::Result;

mod app;
mod config;
mod io;

use app::BenchApplication;

fn main() -> Result<()> {
    color_eyre::install()?;
    BenchApplication::from_cli()?.run()
}
