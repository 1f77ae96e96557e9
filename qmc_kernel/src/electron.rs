//! Electron coordinates of a batch of walkers.

use crate::error::{Error, Result};
use nalgebra::Vector3;
use ndarray::Array3;
use std::str::FromStr;

/// Memory layout of a flat coordinate array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `[walker][electron][xyz]`
    Normal,
    /// `[xyz][walker][electron]`
    Transposed,
}

impl TryFrom<char> for Layout {
    type Error = Error;

    fn try_from(c: char) -> Result<Self> {
        match c {
            'N' | 'n' => Ok(Layout::Normal),
            'T' | 't' => Ok(Layout::Transposed),
            other => Err(Error::InvalidArgument(format!(
                "layout must be 'N' or 'T', got {other:?}"
            ))),
        }
    }
}

impl FromStr for Layout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Layout::try_from(c),
            _ => Err(Error::InvalidArgument(format!(
                "layout must be 'N' or 'T', got {s:?}"
            ))),
        }
    }
}

/// Positions of `elec_num` electrons for each of `walk_num` walkers, stored
/// as `(walk_num, elec_num, 3)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Walkers {
    coords: Array3<f64>,
}

impl Walkers {
    pub fn from_flat(layout: Layout, walk_num: usize, elec_num: usize, coord: &[f64]) -> Result<Self> {
        if walk_num == 0 {
            return Err(Error::InvalidArgument("walk_num must be positive".to_string()));
        }
        let expected = 3 * walk_num * elec_num;
        if coord.len() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                actual: coord.len(),
            });
        }
        if coord.iter().any(|c| !c.is_finite()) {
            return Err(Error::InvalidArgument(
                "electron coordinates must be finite".to_string(),
            ));
        }

        let coords = match layout {
            Layout::Normal => Array3::from_shape_vec((walk_num, elec_num, 3), coord.to_vec())?,
            Layout::Transposed => Array3::from_shape_vec((3, walk_num, elec_num), coord.to_vec())?
                .permuted_axes([1, 2, 0])
                .as_standard_layout()
                .into_owned(),
        };
        Ok(Self { coords })
    }

    pub fn walk_num(&self) -> usize {
        self.coords.shape()[0]
    }

    pub fn elec_num(&self) -> usize {
        self.coords.shape()[1]
    }

    pub fn position(&self, walker: usize, electron: usize) -> Vector3<f64> {
        Vector3::new(
            self.coords[[walker, electron, 0]],
            self.coords[[walker, electron, 1]],
            self.coords[[walker, electron, 2]],
        )
    }

    /// All electron positions, walker-major (`walker * elec_num + electron`).
    pub fn points(&self) -> Vec<Vector3<f64>> {
        let (walk_num, elec_num) = (self.walk_num(), self.elec_num());
        (0..walk_num)
            .flat_map(|w| (0..elec_num).map(move |e| (w, e)))
            .map(|(w, e)| self.position(w, e))
            .collect()
    }

    pub fn to_flat(&self, layout: Layout) -> Vec<f64> {
        match layout {
            Layout::Normal => self.coords.iter().copied().collect(),
            Layout::Transposed => self.coords.view().permuted_axes([2, 0, 1]).iter().copied().collect(),
        }
    }
}
