//! Configuration of the benchmark run
//!
//! Every field is optional in the YAML file; `with_defaults` fills the gaps
//! and command-line flags override the result.

mod args;

pub use args::Args;

use serde::{Deserialize, Serialize};

/// Main configuration structure of a benchmark run
#[derive(Debug, Deserialize, Serialize)]
pub struct BenchConfig {
    /// Structure document (YAML or JSON)
    pub structure: Option<String>,
    pub walk_num: Option<usize>,
    /// Number of timed in-place MO VGL evaluations
    pub iterations: Option<usize>,
    pub seed: Option<u64>,
    /// Width of the normal displacement of the initial walkers (bohr)
    pub spread: Option<f64>,
    /// Coordinate layout, "N" or "T"
    pub layout: Option<String>,
    pub determinant: Option<DeterminantConfig>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            structure: Some("data/h2o-sto3g.yaml".to_string()),
            walk_num: Some(100),
            iterations: Some(10),
            seed: Some(42),
            spread: Some(1.0),
            layout: Some("T".to_string()),
            determinant: None,
        }
    }
}

impl BenchConfig {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.structure.is_none() {
            self.structure = defaults.structure;
        }
        if self.walk_num.is_none() {
            self.walk_num = defaults.walk_num;
        }
        if self.iterations.is_none() {
            self.iterations = defaults.iterations;
        }
        if self.seed.is_none() {
            self.seed = defaults.seed;
        }
        if self.spread.is_none() {
            self.spread = defaults.spread;
        }
        if self.layout.is_none() {
            self.layout = defaults.layout;
        }
        if let Some(det) = self.determinant.take() {
            self.determinant = Some(det.with_defaults());
        }
        self
    }

    /// Overrides configured values with the ones given on the command line
    pub fn merge_args(mut self, args: &Args) -> Self {
        if let Some(structure) = &args.structure {
            self.structure = Some(structure.clone());
        }
        self.walk_num = args.walk_num.or(self.walk_num);
        self.iterations = args.iterations.or(self.iterations);
        self.seed = args.seed.or(self.seed);
        if let Some(layout) = &args.layout {
            self.layout = Some(layout.clone());
        }
        self
    }
}

/// Determinant expansion. Missing occupations mean the ground state
/// (lowest `up` alpha and `dn` beta orbitals), resolved once the structure
/// is known.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DeterminantConfig {
    pub kind: Option<char>,
    /// One list of 0-based MO indices per alpha determinant
    pub alpha: Option<Vec<Vec<usize>>>,
    /// One list of 0-based MO indices per beta determinant
    pub beta: Option<Vec<Vec<usize>>>,
}

impl Default for DeterminantConfig {
    fn default() -> Self {
        DeterminantConfig {
            kind: Some('G'),
            alpha: None,
            beta: None,
        }
    }
}

impl DeterminantConfig {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        if self.kind.is_none() {
            self.kind = Self::default().kind;
        }
        self
    }
}
