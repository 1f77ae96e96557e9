//! Cartesian Gaussian basis functions with analytic value, gradient and
//! Laplacian, and their expansion into atomic orbitals.

pub mod basis;
pub mod cgto;
pub mod gto;

#[cfg(test)]
mod gto_test;
#[cfg(test)]
mod helper;

pub use basis::{cartesian_components, AoBasis, Basis, BasisError, Shell};
pub use cgto::ContractedGTO;
pub use gto::{GTO, GTO1d};
