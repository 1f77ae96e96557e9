//! Local energy of the multi-determinant wavefunction.

use crate::determinant::{laplacian_ratio, Determinants};
use crate::electron::Walkers;
use crate::error::{Error, Result};
use crate::structure::System;
use ndarray::Array3;
use rayon::prelude::*;

/// Kinetic and potential part of the local energy of one walker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyComponents {
    pub kinetic: f64,
    pub potential: f64,
}

impl EnergyComponents {
    pub fn total(&self) -> f64 {
        self.kinetic + self.potential
    }
}

/// Evaluates every walker in parallel. `mo_vgl` must be the MO tensor of
/// `walkers`.
pub fn local_energies(
    system: &System,
    walkers: &Walkers,
    mo_vgl: &Array3<f64>,
    determinants: &Determinants,
) -> Result<Vec<EnergyComponents>> {
    let elec_num = walkers.elec_num();
    let elec_up = system.elec_up;

    (0..walkers.walk_num())
        .into_par_iter()
        .map(|walker| {
            let first = walker * elec_num;
            let alpha = laplacian_ratio(mo_vgl, first, &determinants.alpha)
                .ok_or(Error::SingularWavefunction { walker })?;
            let beta = laplacian_ratio(mo_vgl, first + elec_up, &determinants.beta)
                .ok_or(Error::SingularWavefunction { walker })?;

            Ok(EnergyComponents {
                kinetic: -0.5 * (alpha + beta),
                potential: potential_energy(system, walkers, walker)?,
            })
        })
        .collect()
}

/// `V_ee + V_en + V_nn` for one walker.
pub fn potential_energy(system: &System, walkers: &Walkers, walker: usize) -> Result<f64> {
    let elec_num = walkers.elec_num();
    let positions: Vec<_> = (0..elec_num).map(|e| walkers.position(walker, e)).collect();

    let coincident = Error::CoincidentParticles { walker };

    let mut v_ee = 0.0;
    for i in 0..elec_num {
        for j in (i + 1)..elec_num {
            let r = (positions[i] - positions[j]).norm();
            if r == 0.0 {
                return Err(coincident);
            }
            v_ee += 1.0 / r;
        }
    }

    let mut v_en = 0.0;
    for r in &positions {
        for nucleus in &system.nuclei {
            let d = (r - nucleus.coords).norm();
            if d == 0.0 {
                return Err(coincident);
            }
            v_en -= nucleus.charge / d;
        }
    }

    Ok(v_ee + v_en + system.nucleus_repulsion)
}
