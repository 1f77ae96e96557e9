//! Python bindings: a `Context` object plus free functions mirroring the
//! session API. Arrays cross the boundary as flat lists; every failure
//! raises `RuntimeError`.

use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;
use qmc_kernel::{Context, Layout};

#[pyclass(name = "Context")]
pub struct PyContext {
    inner: Context,
}

#[pymethods]
impl PyContext {
    fn __repr__(&self) -> PyResult<String> {
        Ok(format!("<Context stage={:?}>", self.inner.stage()))
    }
}

fn to_py_err(err: qmc_kernel::Error) -> PyErr {
    PyRuntimeError::new_err(err.to_string())
}

fn layout(c: char) -> PyResult<Layout> {
    Layout::try_from(c).map_err(to_py_err)
}

#[pyfunction]
fn context_create() -> PyContext {
    PyContext {
        inner: Context::new(),
    }
}

#[pyfunction]
fn load_structure(ctx: &mut PyContext, path: &str) -> PyResult<()> {
    ctx.inner.load_structure(path).map_err(to_py_err)
}

#[pyfunction]
fn get_mo_num(ctx: &PyContext) -> PyResult<usize> {
    ctx.inner.mo_num().map_err(to_py_err)
}

#[pyfunction]
fn get_ao_num(ctx: &PyContext) -> PyResult<usize> {
    ctx.inner.ao_num().map_err(to_py_err)
}

#[pyfunction]
fn get_ao_type(ctx: &PyContext) -> PyResult<String> {
    ctx.inner.ao_type().map_err(to_py_err)
}

#[pyfunction]
fn set_electron_coord(ctx: &mut PyContext, layout_char: char, walk_num: usize, coord: Vec<f64>) -> PyResult<()> {
    ctx.inner
        .set_electron_coord(layout(layout_char)?, walk_num, &coord)
        .map_err(to_py_err)
}

#[pyfunction]
fn get_electron_coord(ctx: &PyContext, layout_char: char) -> PyResult<Vec<f64>> {
    ctx.inner.electron_coord(layout(layout_char)?).map_err(to_py_err)
}

/// Flat MO VGL tensor, `size_max` values.
#[pyfunction]
fn get_mo_vgl(ctx: &mut PyContext, size_max: usize) -> PyResult<Vec<f64>> {
    let vgl = ctx.inner.mo_vgl(size_max).map_err(to_py_err)?;
    Ok(vgl.iter().copied().collect())
}

/// Same values as `get_mo_vgl`, filled through the in-place path.
#[pyfunction]
fn get_mo_vgl_inplace(ctx: &mut PyContext, size_max: usize) -> PyResult<Vec<f64>> {
    let mut buffer = vec![0.0; size_max];
    ctx.inner.mo_vgl_inplace(&mut buffer).map_err(to_py_err)?;
    Ok(buffer)
}

#[pyfunction]
fn set_determinant(
    ctx: &mut PyContext,
    kind: char,
    det_num_alpha: usize,
    det_num_beta: usize,
    mo_index_alpha: Vec<usize>,
    mo_index_beta: Vec<usize>,
) -> PyResult<()> {
    ctx.inner
        .set_determinant(kind, det_num_alpha, det_num_beta, &mo_index_alpha, &mo_index_beta)
        .map_err(to_py_err)
}

#[pyfunction]
fn electron_provided(ctx: &PyContext) -> bool {
    ctx.inner.electron_provided()
}

#[pyfunction]
fn nucleus_provided(ctx: &PyContext) -> bool {
    ctx.inner.nucleus_provided()
}

#[pyfunction]
fn ao_basis_provided(ctx: &PyContext) -> bool {
    ctx.inner.ao_basis_provided()
}

#[pyfunction]
fn mo_basis_provided(ctx: &PyContext) -> bool {
    ctx.inner.mo_basis_provided()
}

#[pyfunction]
fn determinant_provided(ctx: &PyContext) -> bool {
    ctx.inner.determinant_provided()
}

#[pyfunction]
fn local_energy_provided(ctx: &PyContext) -> bool {
    ctx.inner.local_energy_provided()
}

#[pyfunction]
fn get_local_energy(ctx: &mut PyContext, walk_num: usize) -> PyResult<Vec<f64>> {
    ctx.inner.local_energy(walk_num).map_err(to_py_err)
}

#[pymodule]
fn qmc_kernel_py(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyContext>()?;
    m.add_function(wrap_pyfunction!(context_create, m)?)?;
    m.add_function(wrap_pyfunction!(load_structure, m)?)?;
    m.add_function(wrap_pyfunction!(get_mo_num, m)?)?;
    m.add_function(wrap_pyfunction!(get_ao_num, m)?)?;
    m.add_function(wrap_pyfunction!(get_ao_type, m)?)?;
    m.add_function(wrap_pyfunction!(set_electron_coord, m)?)?;
    m.add_function(wrap_pyfunction!(get_electron_coord, m)?)?;
    m.add_function(wrap_pyfunction!(get_mo_vgl, m)?)?;
    m.add_function(wrap_pyfunction!(get_mo_vgl_inplace, m)?)?;
    m.add_function(wrap_pyfunction!(set_determinant, m)?)?;
    m.add_function(wrap_pyfunction!(electron_provided, m)?)?;
    m.add_function(wrap_pyfunction!(nucleus_provided, m)?)?;
    m.add_function(wrap_pyfunction!(ao_basis_provided, m)?)?;
    m.add_function(wrap_pyfunction!(mo_basis_provided, m)?)?;
    m.add_function(wrap_pyfunction!(determinant_provided, m)?)?;
    m.add_function(wrap_pyfunction!(local_energy_provided, m)?)?;
    m.add_function(wrap_pyfunction!(get_local_energy, m)?)?;
    Ok(())
}
