use crate::cgto::ContractedGTO;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest angular momentum accepted for a shell (g functions).
pub const MAX_ANGULAR_MOMENTUM: u32 = 4;

/// Shared interface of primitive and contracted Gaussian functions.
#[allow(non_snake_case)]
pub trait Basis {
    fn evaluate(&self, r: &Vector3<f64>) -> f64;

    /// Value, gradient (x, y, z) and Laplacian at `r`.
    fn vgl(&self, r: &Vector3<f64>) -> [f64; 5];

    // overlap integral
    fn Sab(a: &Self, b: &Self) -> f64;
}

#[derive(Debug, Error, PartialEq)]
pub enum BasisError {
    #[error("shell {shell} refers to nucleus {nucleus}, but only {nucleus_num} nuclei exist")]
    NucleusOutOfRange {
        shell: usize,
        nucleus: usize,
        nucleus_num: usize,
    },
    #[error("shell {shell} has {exponents} exponents and {coefficients} coefficients")]
    ContractionLength {
        shell: usize,
        exponents: usize,
        coefficients: usize,
    },
    #[error("shell {shell} has no primitives")]
    EmptyShell { shell: usize },
    #[error("shell {shell} has non-positive exponent {exponent}")]
    NonPositiveExponent { shell: usize, exponent: f64 },
    #[error("shell {shell} has angular momentum {l}, maximum is {}", MAX_ANGULAR_MOMENTUM)]
    UnsupportedAngularMomentum { shell: usize, l: u32 },
    #[error("shell {shell} cannot be normalized")]
    Unnormalizable { shell: usize },
}

/// A contracted shell as stored in a structure document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shell {
    pub nucleus: usize,
    pub l: u32,
    pub exponents: Vec<f64>,
    pub coefficients: Vec<f64>,
}

/// Cartesian exponents of a shell: x^a y^b z^c with a descending, then b
/// descending (s; x y z; xx xy xz yy yz zz; ...).
pub fn cartesian_components(l: u32) -> Vec<Vector3<i32>> {
    let l = l as i32;
    let mut out = Vec::with_capacity(((l + 1) * (l + 2) / 2) as usize);
    for a in (0..=l).rev() {
        for b in (0..=l - a).rev() {
            out.push(Vector3::new(a, b, l - a - b));
        }
    }
    out
}

/// Atomic orbitals obtained by expanding every shell into its Cartesian
/// components on the owning nucleus.
#[derive(Debug, Clone)]
pub struct AoBasis {
    pub ao_type: String,
    pub functions: Vec<ContractedGTO>,
    /// Shell index of every AO.
    pub shell_of_ao: Vec<usize>,
}

impl AoBasis {
    pub fn from_shells(
        ao_type: &str,
        shells: &[Shell],
        centers: &[Vector3<f64>],
    ) -> Result<Self, BasisError> {
        let mut functions = Vec::new();
        let mut shell_of_ao = Vec::new();

        for (idx, shell) in shells.iter().enumerate() {
            Self::check_shell(idx, shell, centers.len())?;
            let center = centers[shell.nucleus];
            for l_xyz in cartesian_components(shell.l) {
                let cgto =
                    ContractedGTO::new(center, l_xyz, &shell.exponents, &shell.coefficients);
                if !cgto.coefficients.iter().all(|c| c.is_finite())
                    || ContractedGTO::Sab(&cgto, &cgto) <= 0.0
                {
                    return Err(BasisError::Unnormalizable { shell: idx });
                }
                functions.push(cgto);
                shell_of_ao.push(idx);
            }
        }

        Ok(Self {
            ao_type: ao_type.to_string(),
            functions,
            shell_of_ao,
        })
    }

    fn check_shell(idx: usize, shell: &Shell, nucleus_num: usize) -> Result<(), BasisError> {
        if shell.nucleus >= nucleus_num {
            return Err(BasisError::NucleusOutOfRange {
                shell: idx,
                nucleus: shell.nucleus,
                nucleus_num,
            });
        }
        if shell.l > MAX_ANGULAR_MOMENTUM {
            return Err(BasisError::UnsupportedAngularMomentum {
                shell: idx,
                l: shell.l,
            });
        }
        if shell.exponents.is_empty() {
            return Err(BasisError::EmptyShell { shell: idx });
        }
        if shell.exponents.len() != shell.coefficients.len() {
            return Err(BasisError::ContractionLength {
                shell: idx,
                exponents: shell.exponents.len(),
                coefficients: shell.coefficients.len(),
            });
        }
        if let Some(&exponent) = shell.exponents.iter().find(|&&e| !(e > 0.0)) {
            return Err(BasisError::NonPositiveExponent {
                shell: idx,
                exponent,
            });
        }
        Ok(())
    }

    pub fn ao_num(&self) -> usize {
        self.functions.len()
    }

    /// Writes the VGL of every AO at `r` into `out`, laid out as
    /// `[component][ao]` (5 x ao_num).
    pub fn vgl_into(&self, r: &Vector3<f64>, out: &mut [f64]) {
        let ao_num = self.ao_num();
        debug_assert_eq!(out.len(), 5 * ao_num);
        for (i, f) in self.functions.iter().enumerate() {
            let vgl = f.vgl(r);
            for (k, v) in vgl.iter().enumerate() {
                out[k * ao_num + i] = *v;
            }
        }
    }
}
