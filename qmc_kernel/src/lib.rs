//! Session library for evaluating molecular orbitals and local energies of
//! electron walkers.
//!
//! ```no_run
//! use qmc_kernel::{Context, Layout};
//!
//! let mut ctx = Context::new();
//! ctx.load_structure("data/h2o-sto3g.yaml")?;
//! let coord = vec![0.1; 3 * 10];
//! ctx.set_electron_coord(Layout::Normal, 1, &coord)?;
//! let mo_num = ctx.mo_num()?;
//! let vgl = ctx.mo_vgl(5 * 10 * mo_num)?;
//! # Ok::<(), qmc_kernel::Error>(())
//! ```

pub mod context;
pub mod determinant;
pub mod electron;
pub mod energy;
pub mod error;
pub mod orbital;
pub mod sampling;
pub mod structure;

pub use context::{Context, Stage};
pub use determinant::{DeterminantKind, Determinants};
pub use electron::{Layout, Walkers};
pub use energy::EnergyComponents;
pub use error::{Error, Result};
pub use sampling::initial_walkers;
pub use structure::{Structure, System};
