/* Implement contracted gaussian type orbital (CGTO),
   based on gto.rs, which is the basic gaussian type orbital
*/

use crate::basis::Basis;
use crate::gto::GTO;
use itertools::iproduct;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Fixed linear combination of primitives sharing one center and one
/// Cartesian angular part. Coefficients refer to normalized primitives and
/// are rescaled so that the contraction has unit self-overlap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractedGTO {
    pub primitives: Vec<GTO>,
    pub coefficients: Vec<f64>,
    pub l_xyz: Vector3<i32>,
    pub center: Vector3<f64>,
}

impl ContractedGTO {
    pub fn new(
        center: Vector3<f64>,
        l_xyz: Vector3<i32>,
        exponents: &[f64],
        coefficients: &[f64],
    ) -> Self {
        let primitives = exponents
            .iter()
            .map(|&alpha| GTO::new(alpha, l_xyz, center))
            .collect();
        let mut cgto = Self {
            primitives,
            coefficients: coefficients.to_vec(),
            l_xyz,
            center,
        };

        let self_overlap = Self::Sab(&cgto, &cgto);
        if self_overlap > 0.0 {
            let scale = 1.0 / self_overlap.sqrt();
            cgto.coefficients.iter_mut().for_each(|c| *c *= scale);
        }
        cgto
    }

    /// Total angular momentum `i + j + k`.
    pub fn angular_momentum(&self) -> i32 {
        self.l_xyz.x + self.l_xyz.y + self.l_xyz.z
    }
}

impl Basis for ContractedGTO {
    fn evaluate(&self, r: &Vector3<f64>) -> f64 {
        self.primitives
            .iter()
            .zip(self.coefficients.iter())
            .map(|(p, c)| c * p.evaluate(r))
            .sum()
    }

    fn vgl(&self, r: &Vector3<f64>) -> [f64; 5] {
        let mut out = [0.0; 5];
        for (p, c) in self.primitives.iter().zip(self.coefficients.iter()) {
            let pv = p.vgl(r);
            for (o, v) in out.iter_mut().zip(pv.iter()) {
                *o += c * v;
            }
        }
        out
    }

    #[allow(non_snake_case)]
    fn Sab(a: &Self, b: &Self) -> f64 {
        iproduct!(
            a.primitives.iter().zip(a.coefficients.iter()),
            b.primitives.iter().zip(b.coefficients.iter())
        )
        .map(|((pa, ca), (pb, cb))| ca * cb * GTO::Sab(pa, pb))
        .sum()
    }
}
