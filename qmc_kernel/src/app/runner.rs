use crate::config::{BenchConfig, DeterminantConfig};
use color_eyre::eyre::{bail, ensure, eyre, Result, WrapErr};
use qmc_kernel::{initial_walkers, Context, Error, Layout, Walkers};
use std::time::Instant;
use tracing::info;

/// Structure path that must be rejected before the real one is loaded.
const MISSING_STRUCTURE: &str = "fake.h5";

/// Readiness of the context inputs before the determinants are set, in
/// reporting order.
pub type Probes = [(&'static str, bool); 4];

pub struct BenchOutcome {
    pub mo_num: usize,
    pub ao_type: String,
    pub walk_num: usize,
    pub iterations: usize,
    /// Average wall time of one in-place MO VGL evaluation
    pub step_ms: f64,
    pub probes: Probes,
    pub local_energy: Vec<f64>,
    pub kinetic_energy: Vec<f64>,
    pub potential_energy: Vec<f64>,
}

pub fn run_benchmark(config: &BenchConfig) -> Result<BenchOutcome> {
    let structure = config
        .structure
        .as_deref()
        .ok_or_else(|| eyre!("No structure document configured"))?;
    let walk_num = config.walk_num.unwrap_or(100);
    let iterations = config.iterations.unwrap_or(10).max(1);
    let seed = config.seed.unwrap_or(42);
    let spread = config.spread.unwrap_or(1.0);
    let layout: Layout = config
        .layout
        .as_deref()
        .unwrap_or("T")
        .parse()
        .wrap_err("Invalid coordinate layout")?;

    let mut ctx = Context::new();
    check_missing_input(&mut ctx)?;

    info!("\nLoading structure from {}", structure);
    ctx.load_structure(structure)
        .wrap_err_with(|| format!("Unable to load structure {}", structure))?;

    let mo_num = ctx.mo_num()?;
    let ao_type = ctx.ao_type()?;
    let elec_num = ctx.elec_num()?;
    info!("mo_num = {}, ao_type = {}, elec_num = {}", mo_num, ao_type, elec_num);
    ensure!(ao_type.contains('G'), "Expected a Gaussian basis, got {:?}", ao_type);

    let coord = initial_walkers(ctx.system()?, walk_num, spread, seed)?;
    let coord = match layout {
        Layout::Normal => coord,
        Layout::Transposed => Walkers::from_flat(Layout::Normal, walk_num, elec_num, &coord)?.to_flat(layout),
    };
    ctx.set_electron_coord(layout, walk_num, &coord)?;

    let size_max = 5 * walk_num * elec_num * mo_num;
    let mo_vgl = ctx.mo_vgl(size_max)?;
    ensure!(
        mo_vgl.len() == size_max,
        "MO VGL has {} values, expected {}",
        mo_vgl.len(),
        size_max
    );

    let mut buffer = vec![0.0; size_max];
    let start = Instant::now();
    for _ in 0..iterations {
        ctx.mo_vgl_inplace(&mut buffer)?;
    }
    let step_ms = start.elapsed().as_secs_f64() * 1000.0 / iterations as f64;

    let probes = [
        ("electron", ctx.electron_provided()),
        ("nucleus", ctx.nucleus_provided()),
        ("ao_basis", ctx.ao_basis_provided()),
        ("mo_basis", ctx.mo_basis_provided()),
    ];

    let (alpha, beta) = resolve_determinants(config.determinant.as_ref(), &ctx)?;
    let kind = config
        .determinant
        .as_ref()
        .and_then(|d| d.kind)
        .unwrap_or('G');
    let mo_index_alpha: Vec<usize> = alpha.iter().flatten().copied().collect();
    let mo_index_beta: Vec<usize> = beta.iter().flatten().copied().collect();
    ctx.set_determinant(kind, alpha.len(), beta.len(), &mo_index_alpha, &mo_index_beta)
        .wrap_err("Unable to set determinants")?;
    ensure!(ctx.local_energy_provided(), "Context is not ready for local energies");

    let local_energy = ctx.local_energy(walk_num)?;
    let kinetic_energy = ctx.kinetic_energy(walk_num)?;
    let potential_energy = ctx.potential_energy(walk_num)?;

    Ok(BenchOutcome {
        mo_num,
        ao_type,
        walk_num,
        iterations,
        step_ms,
        probes,
        local_energy,
        kinetic_energy,
        potential_energy,
    })
}

fn check_missing_input(ctx: &mut Context) -> Result<()> {
    match ctx.load_structure(MISSING_STRUCTURE) {
        Err(Error::InvalidOrMissingInput { reason, .. }) => {
            info!("Loading {} failed as expected: {}", MISSING_STRUCTURE, reason);
            Ok(())
        }
        Err(other) => bail!("Loading {} failed with an unexpected error: {}", MISSING_STRUCTURE, other),
        Ok(()) => bail!("Loading {} should have failed", MISSING_STRUCTURE),
    }
}

/// Occupations from the configuration, or the ground state for whatever is
/// missing.
fn resolve_determinants(
    config: Option<&DeterminantConfig>,
    ctx: &Context,
) -> Result<(Vec<Vec<usize>>, Vec<Vec<usize>>)> {
    let up = ctx.elec_up_num()?;
    let dn = ctx.elec_dn_num()?;
    let alpha = config
        .and_then(|d| d.alpha.clone())
        .unwrap_or_else(|| vec![(0..up).collect()]);
    let beta = config
        .and_then(|d| d.beta.clone())
        .unwrap_or_else(|| vec![(0..dn).collect()]);
    Ok((alpha, beta))
}
