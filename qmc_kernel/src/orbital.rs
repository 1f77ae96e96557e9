//! Atomic- and molecular-orbital values, gradients and Laplacians.
//!
//! Tensors are shaped `(point_num, 5, n)`: the point index runs over
//! `walker * elec_num + electron`, the middle axis holds value, d/dx, d/dy,
//! d/dz and the Laplacian.

use crate::error::Result;
use basis::AoBasis;
use nalgebra::Vector3;
use ndarray::{s, Array2, Array3};
use rayon::prelude::*;

/// Number of VGL components per orbital and point.
pub const VGL_COMPONENTS: usize = 5;

pub fn ao_vgl(basis: &AoBasis, points: &[Vector3<f64>]) -> Result<Array3<f64>> {
    let ao_num = basis.ao_num();
    let data: Vec<f64> = points
        .par_iter()
        .flat_map_iter(|r| {
            let mut buf = vec![0.0; VGL_COMPONENTS * ao_num];
            basis.vgl_into(r, &mut buf);
            buf
        })
        .collect();
    Ok(Array3::from_shape_vec((points.len(), VGL_COMPONENTS, ao_num), data)?)
}

/// Contracts AO VGL with the `mo_num x ao_num` coefficient matrix.
pub fn mo_vgl(ao_vgl: &Array3<f64>, coefficients: &Array2<f64>) -> Result<Array3<f64>> {
    let (point_num, components, ao_num) = ao_vgl.dim();
    let mo_num = coefficients.nrows();

    let flat = ao_vgl.view().into_shape((point_num * components, ao_num))?;
    let mo = flat.dot(&coefficients.t());
    Ok(mo.into_shape((point_num, components, mo_num))?)
}

/// Values only, `(point_num, n)`.
pub fn values(vgl: &Array3<f64>) -> Array2<f64> {
    vgl.slice(s![.., 0, ..]).to_owned()
}
