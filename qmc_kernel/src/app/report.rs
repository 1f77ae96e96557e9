use crate::app::runner::{BenchOutcome, Probes};
use tracing::info;

pub fn report_timing(outcome: &BenchOutcome) {
    info!(
        "\nMO VGL: {} walkers, {} molecular orbitals ({} basis), {} evaluations",
        outcome.walk_num, outcome.mo_num, outcome.ao_type, outcome.iterations
    );
    info!("Time for the calculation of 1 step : {:.6} ms", outcome.step_ms);
}

pub fn report_probes(probes: &Probes) {
    info!("\nReadiness:");
    for (name, provided) in probes {
        info!("  {:<13} provided: {}", name, provided);
    }
}

pub fn report_energies(outcome: &BenchOutcome) {
    let (mean, error) = mean_and_error(&outcome.local_energy);
    let (kinetic, _) = mean_and_error(&outcome.kinetic_energy);
    let (potential, _) = mean_and_error(&outcome.potential_energy);

    info!("\nLocal energy over {} walkers:", outcome.local_energy.len());
    info!("  Kinetic:   {:.10} au", kinetic);
    info!("  Potential: {:.10} au", potential);
    info!("  Total:     {:.10} +/- {:.10} au", mean, error);
}

/// Mean and standard error of the mean.
fn mean_and_error(samples: &[f64]) -> (f64, f64) {
    let n = samples.len();
    if n == 0 {
        return (f64::NAN, f64::NAN);
    }
    let mean = samples.iter().sum::<f64>() / n as f64;
    if n == 1 {
        return (mean, 0.0);
    }
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    (mean, (variance / n as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_error() {
        let (mean, error) = mean_and_error(&[1.0, 2.0, 3.0, 4.0]);
        assert_relative_eq!(mean, 2.5);
        // sample variance 5/3, error sqrt(5/12)
        assert_relative_eq!(error, (5.0f64 / 12.0).sqrt(), epsilon = 1e-14);
        assert_eq!(mean_and_error(&[-7.0]), (-7.0, 0.0));
        assert!(mean_and_error(&[]).0.is_nan());
    }
}
