//! Seeded initial walker positions around the nuclei.

use crate::error::{Error, Result};
use crate::structure::System;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Places every electron at a nucleus plus a normal displacement of width
/// `spread`. Nuclei are repeated by their integer charge and handed out
/// round-robin, so electrons spread over the molecule like the neutral atoms.
/// Returns `walk_num * elec_num * 3` coordinates in `'N'` layout.
pub fn initial_walkers(system: &System, walk_num: usize, spread: f64, seed: u64) -> Result<Vec<f64>> {
    if walk_num == 0 {
        return Err(Error::InvalidArgument("walk_num must be positive".to_string()));
    }
    if !spread.is_finite() || spread < 0.0 {
        return Err(Error::InvalidArgument(format!(
            "spread must be finite and non-negative, got {spread}"
        )));
    }
    let normal = Normal::new(0.0, spread)
        .map_err(|e| Error::InvalidArgument(format!("invalid spread {spread}: {e}")))?;

    let mut sites: Vec<usize> = system
        .nuclei
        .iter()
        .enumerate()
        .flat_map(|(i, n)| std::iter::repeat(i).take(n.charge.round().max(1.0) as usize))
        .collect();
    if sites.is_empty() {
        sites.push(0);
    }

    let elec_num = system.elec_num();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut coords = Vec::with_capacity(3 * walk_num * elec_num);
    for _ in 0..walk_num {
        for e in 0..elec_num {
            let center = system.nuclei[sites[e % sites.len()]].coords;
            for k in 0..3 {
                coords.push(center[k] + normal.sample(&mut rng));
            }
        }
    }
    Ok(coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::Structure;

    fn water() -> System {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/h2o-sto3g.yaml");
        let structure = Structure::from_file(path).unwrap();
        System::from_structure(&structure, path).unwrap()
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let system = water();
        let a = initial_walkers(&system, 4, 1.0, 7).unwrap();
        let b = initial_walkers(&system, 4, 1.0, 7).unwrap();
        let c = initial_walkers(&system, 4, 1.0, 8).unwrap();
        assert_eq!(a.len(), 4 * 10 * 3);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_zero_spread_sits_on_nuclei() {
        let system = water();
        let coords = initial_walkers(&system, 1, 0.0, 1).unwrap();
        // sites are O x8, H, H; electron 8 goes to the first hydrogen
        assert_eq!(&coords[0..3], system.nuclei[0].coords.as_slice());
        assert_eq!(&coords[24..27], system.nuclei[1].coords.as_slice());
        assert_eq!(&coords[27..30], system.nuclei[2].coords.as_slice());
    }

    #[test]
    fn test_invalid_arguments() {
        let system = water();
        assert!(initial_walkers(&system, 0, 1.0, 1).is_err());
        assert!(initial_walkers(&system, 1, -1.0, 1).is_err());
        assert!(initial_walkers(&system, 1, f64::NAN, 1).is_err());
        assert!(initial_walkers(&system, 1, f64::INFINITY, 1).is_err());
    }
}
