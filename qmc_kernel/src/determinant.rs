//! Determinant configuration and Slater-determinant evaluation.

use crate::error::{Error, Result};
use nalgebra::DMatrix;
use ndarray::Array3;
use std::collections::HashSet;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeterminantKind {
    /// Arbitrary orbital occupations per determinant.
    General,
}

impl TryFrom<char> for DeterminantKind {
    type Error = Error;

    fn try_from(c: char) -> Result<Self> {
        match c {
            'G' | 'g' => Ok(DeterminantKind::General),
            other => Err(Error::InvalidArgument(format!(
                "unknown determinant type {other:?}, expected 'G'"
            ))),
        }
    }
}

impl FromStr for DeterminantKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => DeterminantKind::try_from(c),
            _ => Err(Error::InvalidArgument(format!(
                "unknown determinant type {s:?}, expected 'G'"
            ))),
        }
    }
}

/// Occupied molecular orbitals of every alpha and beta determinant. The
/// wavefunction is `(sum of alpha determinants) * (sum of beta determinants)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Determinants {
    pub kind: DeterminantKind,
    /// `det_num_alpha` lists of `elec_up` 0-based MO indices.
    pub alpha: Vec<Vec<usize>>,
    /// `det_num_beta` lists of `elec_dn` 0-based MO indices.
    pub beta: Vec<Vec<usize>>,
}

impl Determinants {
    /// Builds the configuration from flattened index arrays
    /// (`det_num_alpha * elec_up` and `det_num_beta * elec_dn` entries).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: DeterminantKind,
        det_num_alpha: usize,
        det_num_beta: usize,
        mo_index_alpha: &[usize],
        mo_index_beta: &[usize],
        elec_up: usize,
        elec_dn: usize,
        mo_num: usize,
    ) -> Result<Self> {
        let alpha = split_occupations("alpha", det_num_alpha, elec_up, mo_index_alpha, mo_num)?;
        let beta = split_occupations("beta", det_num_beta, elec_dn, mo_index_beta, mo_num)?;
        Ok(Self { kind, alpha, beta })
    }

    /// Single determinant occupying the lowest orbitals of each spin.
    pub fn ground_state(elec_up: usize, elec_dn: usize) -> Self {
        Self {
            kind: DeterminantKind::General,
            alpha: vec![(0..elec_up).collect()],
            beta: vec![(0..elec_dn).collect()],
        }
    }

    pub fn det_num_alpha(&self) -> usize {
        self.alpha.len()
    }

    pub fn det_num_beta(&self) -> usize {
        self.beta.len()
    }
}

fn split_occupations(
    spin: &str,
    det_num: usize,
    elec: usize,
    indices: &[usize],
    mo_num: usize,
) -> Result<Vec<Vec<usize>>> {
    if det_num == 0 {
        return Err(Error::InvalidArgument(format!(
            "det_num_{spin} must be at least 1"
        )));
    }
    if indices.len() != det_num * elec {
        return Err(Error::InvalidArgument(format!(
            "mo_index_{spin} has {} entries, expected det_num_{spin} * {elec} = {}",
            indices.len(),
            det_num * elec
        )));
    }
    if let Some(bad) = indices.iter().find(|&&i| i >= mo_num) {
        return Err(Error::InvalidArgument(format!(
            "mo_index_{spin} contains {bad}, but only {mo_num} molecular orbitals exist"
        )));
    }

    if elec == 0 {
        return Ok(vec![Vec::new(); det_num]);
    }
    let occupations: Vec<Vec<usize>> = indices.chunks(elec).map(|c| c.to_vec()).collect();
    for (k, occ) in occupations.iter().enumerate() {
        let unique: HashSet<_> = occ.iter().collect();
        if unique.len() != occ.len() {
            return Err(Error::InvalidArgument(format!(
                "{spin} determinant {k} occupies an orbital twice"
            )));
        }
    }
    Ok(occupations)
}

/// Value of `sum_K D_K` for one spin channel. `first_point` is the row of
/// the first electron of that channel in `mo_vgl`.
pub fn channel_value(mo_vgl: &Array3<f64>, first_point: usize, occupations: &[Vec<usize>]) -> f64 {
    occupations
        .iter()
        .map(|occ| slater_matrix(mo_vgl, first_point, occ).determinant())
        .sum()
}

/// `sum_i lap_i(Psi) / Psi` for one spin channel, `Psi = sum_K D_K`.
/// `None` when the channel wavefunction vanishes. Individual determinants
/// may be singular.
pub fn laplacian_ratio(mo_vgl: &Array3<f64>, first_point: usize, occupations: &[Vec<usize>]) -> Option<f64> {
    let n = occupations.first().map_or(0, |occ| occ.len());
    if n == 0 {
        return Some(0.0);
    }

    let psi = channel_value(mo_vgl, first_point, occupations);
    if psi == 0.0 || !psi.is_finite() {
        return None;
    }

    // lap_i D = det(A with row i replaced by the Laplacians at r_i)
    let mut laplacian = 0.0;
    for occ in occupations {
        let slater = slater_matrix(mo_vgl, first_point, occ);
        for i in 0..n {
            let mut replaced = slater.clone();
            for (j, &orbital) in occ.iter().enumerate() {
                replaced[(i, j)] = mo_vgl[[first_point + i, 4, orbital]];
            }
            laplacian += replaced.determinant();
        }
    }
    Some(laplacian / psi)
}

fn slater_matrix(mo_vgl: &Array3<f64>, first_point: usize, occ: &[usize]) -> DMatrix<f64> {
    let n = occ.len();
    DMatrix::from_fn(n, n, |i, j| mo_vgl[[first_point + i, 0, occ[j]]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kind_parsing() {
        assert_eq!(DeterminantKind::try_from('G').unwrap(), DeterminantKind::General);
        assert_eq!("g".parse::<DeterminantKind>().unwrap(), DeterminantKind::General);
        assert!(DeterminantKind::try_from('S').is_err());
    }

    #[test]
    fn test_split_occupations() {
        let dets = Determinants::new(
            DeterminantKind::General,
            2,
            1,
            &[0, 1, 0, 2],
            &[0, 1],
            2,
            2,
            4,
        )
        .unwrap();
        assert_eq!(dets.alpha, vec![vec![0, 1], vec![0, 2]]);
        assert_eq!(dets.beta, vec![vec![0, 1]]);
        assert_eq!(dets.det_num_alpha(), 2);
        assert_eq!(dets.det_num_beta(), 1);
    }

    #[test]
    fn test_rejects_invalid_configurations() {
        let kind = DeterminantKind::General;
        // wrong length
        assert!(Determinants::new(kind, 1, 1, &[0], &[0, 1], 2, 2, 4).is_err());
        // out of range
        assert!(Determinants::new(kind, 1, 1, &[0, 4], &[0, 1], 2, 2, 4).is_err());
        // doubly occupied
        assert!(Determinants::new(kind, 1, 1, &[1, 1], &[0, 1], 2, 2, 4).is_err());
        // no determinants
        assert!(Determinants::new(kind, 0, 1, &[], &[0, 1], 2, 2, 4).is_err());
        // empty beta channel is fine
        let dets = Determinants::new(kind, 1, 1, &[0, 1], &[], 2, 0, 4).unwrap();
        assert_eq!(dets.beta, vec![Vec::<usize>::new()]);
    }

    #[test]
    fn test_laplacian_ratio_of_diagonal_matrix() {
        // two electrons, orbital j only nonzero at electron j: D = v00 * v11
        let mut mo_vgl = Array3::<f64>::zeros((2, 5, 2));
        mo_vgl[[0, 0, 0]] = 2.0;
        mo_vgl[[1, 0, 1]] = 4.0;
        mo_vgl[[0, 4, 0]] = 6.0;
        mo_vgl[[1, 4, 1]] = -2.0;

        let occ = vec![vec![0, 1]];
        assert_relative_eq!(channel_value(&mo_vgl, 0, &occ), 8.0);
        // 6/2 + (-2)/4
        assert_relative_eq!(laplacian_ratio(&mo_vgl, 0, &occ).unwrap(), 2.5, epsilon = 1e-14);
        // swapped occupation flips the sign of D but not the ratio
        let swapped = vec![vec![1, 0]];
        assert_relative_eq!(channel_value(&mo_vgl, 0, &swapped), -8.0);
        assert_relative_eq!(laplacian_ratio(&mo_vgl, 0, &swapped).unwrap(), 2.5, epsilon = 1e-14);
    }

    #[test]
    fn test_singular_determinant_in_expansion() {
        // orbital 2 vanishes with its Laplacian, so the first determinant is singular
        let mut mo_vgl = Array3::<f64>::zeros((2, 5, 3));
        mo_vgl[[0, 0, 0]] = 2.0;
        mo_vgl[[1, 0, 1]] = 4.0;
        mo_vgl[[0, 4, 0]] = 6.0;
        mo_vgl[[1, 4, 1]] = -2.0;

        let expansion = vec![vec![0, 2], vec![0, 1]];
        assert_relative_eq!(channel_value(&mo_vgl, 0, &expansion), 8.0);
        let ratio = laplacian_ratio(&mo_vgl, 0, &expansion).unwrap();
        assert_relative_eq!(ratio, laplacian_ratio(&mo_vgl, 0, &[vec![0, 1]]).unwrap(), epsilon = 1e-14);
        assert_relative_eq!(ratio, 2.5, epsilon = 1e-14);
    }

    #[test]
    fn test_singular_channel() {
        let mo_vgl = Array3::<f64>::zeros((2, 5, 2));
        assert!(laplacian_ratio(&mo_vgl, 0, &[vec![0, 1]]).is_none());
        assert_eq!(laplacian_ratio(&mo_vgl, 0, &[vec![]]), Some(0.0));
    }
}
