//! Error kinds reported by a [`Context`](crate::Context).

use crate::context::Stage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing, unreadable, malformed or inconsistent structure input.
    #[error("invalid or missing input {origin}: {reason}")]
    InvalidOrMissingInput { origin: String, reason: String },

    /// An operation was called before the context reached the stage it needs.
    #[error("{operation} requires stage {required:?}, but the context is at {actual:?}")]
    OutOfOrder {
        operation: &'static str,
        required: Stage,
        actual: Stage,
    },

    /// A size argument or caller buffer does not match the computed quantity.
    #[error("{quantity} holds {expected} values, but a size of {actual} was given")]
    BufferSize {
        quantity: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A coordinate array does not match walk_num x elec_num x 3.
    #[error("coordinate array has {actual} values, expected {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The alpha or beta determinant expansion sums to zero at the given walker.
    #[error("wavefunction vanishes at walker {walker}")]
    SingularWavefunction { walker: usize },

    /// Two electrons, or an electron and a nucleus, share a position.
    #[error("two particles coincide at walker {walker}")]
    CoincidentParticles { walker: usize },

    #[error(transparent)]
    Tensor(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_input(origin: impl Into<String>, reason: impl ToString) -> Self {
        Error::InvalidOrMissingInput {
            origin: origin.into(),
            reason: reason.to_string(),
        }
    }
}
