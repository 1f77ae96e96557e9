//! Input/Output operations for the benchmark
//!
//! This module handles logging setup.

mod output;

pub use output::setup_output;
