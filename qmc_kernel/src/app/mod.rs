mod report;
mod runner;

use self::report::{report_energies, report_probes, report_timing};
use self::runner::run_benchmark;
use crate::config::{Args, BenchConfig};
use crate::io::setup_output;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use std::fs;
use tracing::info;

pub struct BenchApplication {
    args: Args,
    config: BenchConfig,
}

impl BenchApplication {
    pub fn from_cli() -> Result<Self> {
        let args = Args::parse();
        let config = load_config(&args)?;
        Ok(Self { args, config })
    }

    pub fn run(self) -> Result<()> {
        setup_output(self.args.output.as_ref());
        info!("Configuration loaded:\n{:?}", self.config);

        let outcome = run_benchmark(&self.config)?;
        report_timing(&outcome);
        report_probes(&outcome.probes);
        report_energies(&outcome);
        Ok(())
    }
}

fn load_config(args: &Args) -> Result<BenchConfig> {
    let config = match &args.config_file {
        Some(path) => {
            let content = fs::read_to_string(path)
                .wrap_err_with(|| format!("Unable to read configuration file: {}", path))?;
            serde_yml::from_str::<BenchConfig>(&content)
                .wrap_err("Failed to parse configuration file")?
        }
        None => BenchConfig::default(),
    };
    Ok(config.merge_args(args).with_defaults())
}
