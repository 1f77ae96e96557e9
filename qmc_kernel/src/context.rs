//! The session object. A [`Context`] moves through
//! `Created -> StructureLoaded -> ElectronsSet -> DeterminantSet`; every
//! stage owns exactly the data valid at that point, and derived quantities
//! (orbital tensors, energies) are cached until the inputs change.

use crate::determinant::{DeterminantKind, Determinants};
use crate::electron::{Layout, Walkers};
use crate::energy::{self, EnergyComponents};
use crate::error::{Error, Result};
use crate::orbital::{self, VGL_COMPONENTS};
use crate::structure::{Structure, System};
use ndarray::{Array2, Array3};
use std::mem;
use std::path::Path;
use tracing::{debug, info, warn};

/// Progress of a [`Context`], ordered from least to most prepared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Created,
    StructureLoaded,
    ElectronsSet,
    DeterminantSet,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Created,
    Loaded(System),
    Positioned(System, Walkers),
    Ready(System, Walkers, Determinants),
}

impl State {
    fn stage(&self) -> Stage {
        match self {
            State::Created => Stage::Created,
            State::Loaded(..) => Stage::StructureLoaded,
            State::Positioned(..) => Stage::ElectronsSet,
            State::Ready(..) => Stage::DeterminantSet,
        }
    }

    fn out_of_order(&self, operation: &'static str, required: Stage) -> Error {
        Error::OutOfOrder {
            operation,
            required,
            actual: self.stage(),
        }
    }

    fn system(&self, operation: &'static str) -> Result<&System> {
        match self {
            State::Loaded(system) | State::Positioned(system, _) | State::Ready(system, ..) => Ok(system),
            State::Created => Err(self.out_of_order(operation, Stage::StructureLoaded)),
        }
    }

    fn positioned(&self, operation: &'static str) -> Result<(&System, &Walkers)> {
        match self {
            State::Positioned(system, walkers) | State::Ready(system, walkers, _) => Ok((system, walkers)),
            _ => Err(self.out_of_order(operation, Stage::ElectronsSet)),
        }
    }

    fn ready(&self, operation: &'static str) -> Result<(&System, &Walkers, &Determinants)> {
        match self {
            State::Ready(system, walkers, determinants) => Ok((system, walkers, determinants)),
            _ => Err(self.out_of_order(operation, Stage::DeterminantSet)),
        }
    }
}

/// Quantities derived from the current coordinates.
#[derive(Debug, Default)]
struct Cache {
    ao_vgl: Option<Array3<f64>>,
    mo_vgl: Option<Array3<f64>>,
    energies: Option<Vec<EnergyComponents>>,
}

impl Cache {
    fn ao_vgl(&mut self, state: &State, operation: &'static str) -> Result<&Array3<f64>> {
        let ao = match self.ao_vgl.take() {
            Some(ao) => ao,
            None => {
                let (system, walkers) = state.positioned(operation)?;
                debug!("Computing AO VGL for {} points", walkers.walk_num() * walkers.elec_num());
                orbital::ao_vgl(&system.ao_basis, &walkers.points())?
            }
        };
        Ok(self.ao_vgl.insert(ao))
    }

    fn mo_vgl(&mut self, state: &State, operation: &'static str) -> Result<&Array3<f64>> {
        let mo = match self.mo_vgl.take() {
            Some(mo) => mo,
            None => {
                let (system, _) = state.positioned(operation)?;
                let ao = self.ao_vgl(state, operation)?;
                debug!("Contracting AO VGL into {} molecular orbitals", system.mo_num());
                orbital::mo_vgl(ao, &system.mo_coefficients)?
            }
        };
        Ok(self.mo_vgl.insert(mo))
    }

    fn energies(&mut self, state: &State, operation: &'static str) -> Result<&[EnergyComponents]> {
        let energies = match self.energies.take() {
            Some(energies) => energies,
            None => {
                let (system, walkers, determinants) = state.ready(operation)?;
                let mo = self.mo_vgl(state, operation)?;
                debug!("Evaluating local energy of {} walkers", walkers.walk_num());
                energy::local_energies(system, walkers, mo, determinants)?
            }
        };
        Ok(self.energies.insert(energies))
    }
}

/// Owned session handle. Failed calls never change the context.
#[derive(Debug, Default)]
pub struct Context {
    state: State,
    cache: Cache,
}

fn check_size(quantity: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        warn!("{} size mismatch: expected {}, got {}", quantity, expected, actual);
        return Err(Error::BufferSize {
            quantity,
            expected,
            actual,
        });
    }
    Ok(())
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.state.stage()
    }

    /// Loads a structure document. Replaces any previous structure and drops
    /// electrons and determinants with it.
    pub fn load_structure<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let structure = Structure::from_file(path).inspect_err(|e| warn!("{}", e))?;
        let system = System::from_structure(&structure, &origin)?;
        self.install(system);
        Ok(())
    }

    /// Same as [`Context::load_structure`] from an in-memory document.
    pub fn load_system(&mut self, structure: &Structure) -> Result<()> {
        let system = System::from_structure(structure, &structure.name)?;
        self.install(system);
        Ok(())
    }

    fn install(&mut self, system: System) {
        info!(
            "Loaded {} ({}): {} nuclei, {} AOs, {} MOs, {} up + {} down electrons",
            system.name,
            system.basis_name,
            system.nucleus_num(),
            system.ao_num(),
            system.mo_num(),
            system.elec_up,
            system.elec_dn
        );
        self.state = State::Loaded(system);
        self.cache = Cache::default();
    }

    /// Sets the coordinates of all electrons of `walk_num` walkers. A
    /// configured determinant stays in place.
    pub fn set_electron_coord(&mut self, layout: Layout, walk_num: usize, coord: &[f64]) -> Result<()> {
        let elec_num = self.state.system("set_electron_coord")?.elec_num();
        let walkers = Walkers::from_flat(layout, walk_num, elec_num, coord).inspect_err(|e| warn!("{}", e))?;

        self.state = match mem::take(&mut self.state) {
            State::Loaded(system) | State::Positioned(system, _) => State::Positioned(system, walkers),
            State::Ready(system, _, determinants) => State::Ready(system, walkers, determinants),
            // unreachable: a system was found above
            State::Created => State::Created,
        };
        self.cache = Cache::default();
        info!("Set coordinates of {} walkers x {} electrons", walk_num, elec_num);
        Ok(())
    }

    /// The loaded system.
    pub fn system(&self) -> Result<&System> {
        self.state.system("system")
    }

    pub fn electron_coord(&self, layout: Layout) -> Result<Vec<f64>> {
        let (_, walkers) = self.state.positioned("electron_coord")?;
        Ok(walkers.to_flat(layout))
    }

    pub fn mo_num(&self) -> Result<usize> {
        Ok(self.state.system("mo_num")?.mo_num())
    }

    pub fn ao_num(&self) -> Result<usize> {
        Ok(self.state.system("ao_num")?.ao_num())
    }

    /// Basis type code of the loaded structure, `"G"` for Gaussians.
    pub fn ao_type(&self) -> Result<String> {
        Ok(self.state.system("ao_type")?.ao_basis.ao_type.clone())
    }

    pub fn nucleus_num(&self) -> Result<usize> {
        Ok(self.state.system("nucleus_num")?.nucleus_num())
    }

    pub fn nucleus_repulsion(&self) -> Result<f64> {
        Ok(self.state.system("nucleus_repulsion")?.nucleus_repulsion)
    }

    pub fn elec_up_num(&self) -> Result<usize> {
        Ok(self.state.system("elec_up_num")?.elec_up)
    }

    pub fn elec_dn_num(&self) -> Result<usize> {
        Ok(self.state.system("elec_dn_num")?.elec_dn)
    }

    pub fn elec_num(&self) -> Result<usize> {
        Ok(self.state.system("elec_num")?.elec_num())
    }

    pub fn walk_num(&self) -> Result<usize> {
        Ok(self.state.positioned("walk_num")?.1.walk_num())
    }

    fn point_num(&self, operation: &'static str) -> Result<usize> {
        let (_, walkers) = self.state.positioned(operation)?;
        Ok(walkers.walk_num() * walkers.elec_num())
    }

    /// AO tensor `(walk_num * elec_num, 5, ao_num)`. `size_max` must be its
    /// element count.
    pub fn ao_vgl(&mut self, size_max: usize) -> Result<Array3<f64>> {
        let expected = VGL_COMPONENTS * self.point_num("ao_vgl")? * self.ao_num()?;
        check_size("ao_vgl", expected, size_max)?;
        Ok(self.cache.ao_vgl(&self.state, "ao_vgl")?.clone())
    }

    /// MO tensor `(walk_num * elec_num, 5, mo_num)`. `size_max` must be its
    /// element count.
    pub fn mo_vgl(&mut self, size_max: usize) -> Result<Array3<f64>> {
        let expected = VGL_COMPONENTS * self.point_num("mo_vgl")? * self.mo_num()?;
        check_size("mo_vgl", expected, size_max)?;
        Ok(self.cache.mo_vgl(&self.state, "mo_vgl")?.clone())
    }

    /// Writes the MO tensor into `buffer`, row-major.
    pub fn mo_vgl_inplace(&mut self, buffer: &mut [f64]) -> Result<()> {
        let expected = VGL_COMPONENTS * self.point_num("mo_vgl_inplace")? * self.mo_num()?;
        check_size("mo_vgl", expected, buffer.len())?;
        let mo = self.cache.mo_vgl(&self.state, "mo_vgl_inplace")?;
        for (dst, src) in buffer.iter_mut().zip(mo.iter()) {
            *dst = *src;
        }
        Ok(())
    }

    /// MO values `(walk_num * elec_num, mo_num)`.
    pub fn mo_value(&mut self, size_max: usize) -> Result<Array2<f64>> {
        let expected = self.point_num("mo_value")? * self.mo_num()?;
        check_size("mo_value", expected, size_max)?;
        Ok(orbital::values(self.cache.mo_vgl(&self.state, "mo_value")?))
    }

    /// Configures the determinant expansion. `mo_index_alpha` holds
    /// `det_num_alpha * elec_up` 0-based MO indices, one determinant after
    /// the other, and likewise for beta.
    pub fn set_determinant(
        &mut self,
        kind: char,
        det_num_alpha: usize,
        det_num_beta: usize,
        mo_index_alpha: &[usize],
        mo_index_beta: &[usize],
    ) -> Result<()> {
        let (system, _) = self.state.positioned("set_determinant")?;
        let kind = DeterminantKind::try_from(kind)?;
        let determinants = Determinants::new(
            kind,
            det_num_alpha,
            det_num_beta,
            mo_index_alpha,
            mo_index_beta,
            system.elec_up,
            system.elec_dn,
            system.mo_num(),
        )
        .inspect_err(|e| warn!("{}", e))?;

        self.state = match mem::take(&mut self.state) {
            State::Positioned(system, walkers) | State::Ready(system, walkers, _) => {
                State::Ready(system, walkers, determinants)
            }
            // unreachable: electrons were found above
            other => other,
        };
        self.cache.energies = None;
        info!(
            "Set {} alpha and {} beta determinants",
            det_num_alpha, det_num_beta
        );
        Ok(())
    }

    pub fn electron_provided(&self) -> bool {
        self.stage() >= Stage::ElectronsSet
    }

    pub fn nucleus_provided(&self) -> bool {
        self.stage() >= Stage::StructureLoaded
    }

    pub fn ao_basis_provided(&self) -> bool {
        self.stage() >= Stage::StructureLoaded
    }

    pub fn mo_basis_provided(&self) -> bool {
        self.stage() >= Stage::StructureLoaded
    }

    pub fn determinant_provided(&self) -> bool {
        self.stage() >= Stage::DeterminantSet
    }

    /// True once the local energy can be computed.
    pub fn local_energy_provided(&self) -> bool {
        self.stage() >= Stage::DeterminantSet
    }

    fn energy_components(&mut self, operation: &'static str, walk_num: usize) -> Result<&[EnergyComponents]> {
        let (_, walkers, _) = self.state.ready(operation)?;
        check_size(operation, walkers.walk_num(), walk_num)?;
        self.cache.energies(&self.state, operation)
    }

    /// Local energy of every walker; `walk_num` must match the configured
    /// walker count.
    pub fn local_energy(&mut self, walk_num: usize) -> Result<Vec<f64>> {
        let energies = self.energy_components("local_energy", walk_num)?;
        Ok(energies.iter().map(EnergyComponents::total).collect())
    }

    pub fn kinetic_energy(&mut self, walk_num: usize) -> Result<Vec<f64>> {
        let energies = self.energy_components("kinetic_energy", walk_num)?;
        Ok(energies.iter().map(|e| e.kinetic).collect())
    }

    pub fn potential_energy(&mut self, walk_num: usize) -> Result<Vec<f64>> {
        let energies = self.energy_components("potential_energy", walk_num)?;
        Ok(energies.iter().map(|e| e.potential).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/h2o-sto3g.yaml");

    #[test]
    fn test_stage_order() {
        assert!(Stage::Created < Stage::StructureLoaded);
        assert!(Stage::StructureLoaded < Stage::ElectronsSet);
        assert!(Stage::ElectronsSet < Stage::DeterminantSet);
    }

    #[test]
    fn test_out_of_order_reports_stages() {
        let mut ctx = Context::new();
        match ctx.mo_num().unwrap_err() {
            Error::OutOfOrder {
                operation,
                required,
                actual,
            } => {
                assert_eq!(operation, "mo_num");
                assert_eq!(required, Stage::StructureLoaded);
                assert_eq!(actual, Stage::Created);
            }
            other => panic!("unexpected error {other:?}"),
        }

        ctx.load_structure(FIXTURE).unwrap();
        assert!(matches!(
            ctx.set_determinant('G', 1, 1, &[0, 1, 2, 3, 4], &[0, 1, 2, 3, 4]),
            Err(Error::OutOfOrder {
                required: Stage::ElectronsSet,
                actual: Stage::StructureLoaded,
                ..
            })
        ));
        assert!(matches!(ctx.local_energy(1), Err(Error::OutOfOrder { .. })));
    }

    #[test]
    fn test_new_coordinates_keep_determinant_and_reset_cache() {
        let mut ctx = Context::new();
        ctx.load_structure(FIXTURE).unwrap();
        let coord: Vec<f64> = (0..30).map(|i| ((i * 7) % 11) as f64 * 0.2 - 1.0 + 0.01 * i as f64).collect();
        ctx.set_electron_coord(Layout::Normal, 1, &coord).unwrap();
        ctx.set_determinant('G', 1, 1, &[0, 1, 2, 3, 4], &[0, 1, 2, 3, 4]).unwrap();
        let first = ctx.local_energy(1).unwrap();

        let shifted: Vec<f64> = coord.iter().map(|c| c + 0.1).collect();
        ctx.set_electron_coord(Layout::Normal, 1, &shifted).unwrap();
        assert_eq!(ctx.stage(), Stage::DeterminantSet);
        let second = ctx.local_energy(1).unwrap();
        assert_ne!(first, second);

        // reloading drops electrons and determinants
        ctx.load_structure(FIXTURE).unwrap();
        assert_eq!(ctx.stage(), Stage::StructureLoaded);
        assert!(!ctx.electron_provided());
    }

    #[test]
    fn test_failed_setters_leave_context_unchanged() {
        let mut ctx = Context::new();
        ctx.load_structure(FIXTURE).unwrap();
        let coord = vec![0.1; 30];
        ctx.set_electron_coord(Layout::Normal, 1, &coord).unwrap();

        assert!(matches!(
            ctx.set_electron_coord(Layout::Normal, 2, &coord),
            Err(Error::ShapeMismatch { expected: 60, actual: 30 })
        ));
        assert_eq!(ctx.walk_num().unwrap(), 1);

        assert!(ctx.set_determinant('G', 1, 1, &[0, 1, 2, 3, 7], &[0, 1, 2, 3, 4]).is_err());
        assert!(ctx.set_determinant('S', 1, 1, &[0, 1, 2, 3, 4], &[0, 1, 2, 3, 4]).is_err());
        assert_eq!(ctx.stage(), Stage::ElectronsSet);
        assert!(!ctx.determinant_provided());
    }

    #[test]
    fn test_context_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Context>();
    }
}
