//! Structure documents and the validated in-memory system built from them.
//!
//! A structure document carries what a calculation needs from its input
//! file: nuclei, electron counts, the contracted Gaussian shells and the
//! molecular-orbital coefficients. Documents are stored as YAML or JSON.

use crate::error::{Error, Result};
use basis::{AoBasis, Shell};
use nalgebra::Vector3;
use ndarray::Array2;
use periodic_table_on_an_enum::Element;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NucleusEntry {
    pub element: String,
    /// Nuclear charge; defaults to the atomic number of `element`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge: Option<f64>,
    /// Position in bohr.
    pub coords: [f64; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElectronCounts {
    pub up: usize,
    pub dn: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoSection {
    pub num: usize,
    /// One row of `ao_num` coefficients per molecular orbital.
    pub coefficients: Vec<Vec<f64>>,
}

/// Serialized form of a molecular system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub name: String,
    #[serde(default)]
    pub basis_name: String,
    pub ao_type: String,
    pub nuclei: Vec<NucleusEntry>,
    pub electrons: ElectronCounts,
    pub shells: Vec<Shell>,
    pub mo: MoSection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StructureFormat {
    Yaml,
    Json,
}

impl StructureFormat {
    fn from_path(path: &Path) -> std::result::Result<Self, String> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "yaml" | "yml" => Ok(StructureFormat::Yaml),
            "json" => Ok(StructureFormat::Json),
            "h5" | "hdf5" => Err("HDF5 containers are not supported, use a YAML or JSON structure document".to_string()),
            "" => Err("file has no extension, expected .yaml, .yml or .json".to_string()),
            other => Err(format!("unsupported structure format .{other}")),
        }
    }
}

impl Structure {
    /// Reads a structure document, choosing the format from the extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let origin = path.display().to_string();

        let bytes = fs::read(path).map_err(|e| Error::invalid_input(&origin, e))?;
        let format = StructureFormat::from_path(path).map_err(|r| Error::invalid_input(&origin, r))?;
        let content = String::from_utf8(bytes).map_err(|e| Error::invalid_input(&origin, e))?;

        debug!("Parsing {:?} structure document {}", format, origin);
        match format {
            StructureFormat::Yaml => Self::from_yaml_str(&content),
            StructureFormat::Json => Self::from_json_str(&content),
        }
        .map_err(|e| match e {
            Error::InvalidOrMissingInput { reason, .. } => Error::InvalidOrMissingInput { origin, reason },
            other => other,
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yml::from_str(content).map_err(|e| Error::invalid_input("<yaml>", e))
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::invalid_input("<json>", e))
    }

    /// Writes the document, choosing the format from the extension.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let format = StructureFormat::from_path(path).map_err(Error::InvalidArgument)?;

        let content = match format {
            StructureFormat::Yaml => {
                serde_yml::to_string(self).map_err(|e| Error::InvalidArgument(e.to_string()))?
            }
            StructureFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| Error::InvalidArgument(e.to_string()))?,
        };
        fs::write(path, content).map_err(|e| Error::invalid_input(origin, e))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Nucleus {
    pub symbol: String,
    pub charge: f64,
    pub coords: Vector3<f64>,
}

/// Validated system: nuclei, expanded AO basis and MO coefficients.
#[derive(Debug, Clone)]
pub struct System {
    pub name: String,
    pub basis_name: String,
    pub nuclei: Vec<Nucleus>,
    pub ao_basis: AoBasis,
    /// `mo_num x ao_num`.
    pub mo_coefficients: Array2<f64>,
    pub elec_up: usize,
    pub elec_dn: usize,
    pub nucleus_repulsion: f64,
}

impl System {
    /// Validates `structure`; `origin` names the input in error messages.
    pub fn from_structure(structure: &Structure, origin: &str) -> Result<Self> {
        let invalid = |reason: String| {
            warn!("Rejecting structure {}: {}", origin, reason);
            Error::invalid_input(origin, reason)
        };

        if structure.ao_type.trim() != "G" {
            return Err(invalid(format!(
                "unsupported ao_type {:?}, only Gaussian (\"G\") basis sets are supported",
                structure.ao_type
            )));
        }
        if structure.nuclei.is_empty() {
            return Err(invalid("structure has no nuclei".to_string()));
        }

        let mut nuclei = Vec::with_capacity(structure.nuclei.len());
        for (idx, entry) in structure.nuclei.iter().enumerate() {
            let element = Element::from_symbol(&entry.element)
                .ok_or_else(|| invalid(format!("nucleus {idx}: invalid element symbol {}", entry.element)))?;
            let charge = entry
                .charge
                .unwrap_or(element.get_atomic_number() as f64);
            if !(charge > 0.0) || !charge.is_finite() {
                return Err(invalid(format!("nucleus {idx}: invalid charge {charge}")));
            }
            if entry.coords.iter().any(|c| !c.is_finite()) {
                return Err(invalid(format!("nucleus {idx}: non-finite coordinates")));
            }
            nuclei.push(Nucleus {
                symbol: element.get_symbol().to_string(),
                charge,
                coords: Vector3::from(entry.coords),
            });
        }

        let nucleus_repulsion = nucleus_repulsion(&nuclei)
            .ok_or_else(|| invalid("two nuclei share the same position".to_string()))?;

        let centers: Vec<Vector3<f64>> = nuclei.iter().map(|n| n.coords).collect();
        let ao_basis = AoBasis::from_shells(structure.ao_type.trim(), &structure.shells, &centers)
            .map_err(|e| invalid(e.to_string()))?;
        let ao_num = ao_basis.ao_num();
        if ao_num == 0 {
            return Err(invalid("structure has no basis functions".to_string()));
        }

        let mo = &structure.mo;
        if mo.num == 0 || mo.coefficients.len() != mo.num {
            return Err(invalid(format!(
                "mo.num is {}, but {} coefficient rows are given",
                mo.num,
                mo.coefficients.len()
            )));
        }
        if let Some((row, len)) = mo
            .coefficients
            .iter()
            .map(|r| r.len())
            .enumerate()
            .find(|(_, len)| *len != ao_num)
        {
            return Err(invalid(format!(
                "mo coefficient row {row} has {len} entries, expected ao_num = {ao_num}"
            )));
        }
        let flat: Vec<f64> = mo.coefficients.iter().flatten().copied().collect();
        if flat.iter().any(|c| !c.is_finite()) {
            return Err(invalid("mo coefficients contain non-finite values".to_string()));
        }
        let mo_coefficients = Array2::from_shape_vec((mo.num, ao_num), flat)?;

        let ElectronCounts { up, dn } = structure.electrons;
        if up + dn == 0 {
            return Err(invalid("structure has no electrons".to_string()));
        }
        if up > mo.num || dn > mo.num {
            return Err(invalid(format!(
                "{up} up and {dn} down electrons cannot occupy {} molecular orbitals",
                mo.num
            )));
        }

        Ok(Self {
            name: structure.name.clone(),
            basis_name: structure.basis_name.clone(),
            nuclei,
            ao_basis,
            mo_coefficients,
            elec_up: up,
            elec_dn: dn,
            nucleus_repulsion,
        })
    }

    pub fn nucleus_num(&self) -> usize {
        self.nuclei.len()
    }

    pub fn ao_num(&self) -> usize {
        self.ao_basis.ao_num()
    }

    pub fn mo_num(&self) -> usize {
        self.mo_coefficients.nrows()
    }

    pub fn elec_num(&self) -> usize {
        self.elec_up + self.elec_dn
    }
}

/// Coulomb repulsion between all nucleus pairs, `None` if two coincide.
fn nucleus_repulsion(nuclei: &[Nucleus]) -> Option<f64> {
    let mut energy = 0.0;
    for (i, a) in nuclei.iter().enumerate() {
        for b in &nuclei[i + 1..] {
            let distance = (a.coords - b.coords).norm();
            if distance == 0.0 {
                return None;
            }
            energy += a.charge * b.charge / distance;
        }
    }
    Some(energy)
}
