use crate::core::models::atom::Atom;
use crate::core::models::graph::{GraphError, Molecule};
use crate::core::models::topology::Bond;
use crate::core::smirks::table::{MatchRecord, TableMatcher};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum MoleculeLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Molecule '{name}' in '{path}' is not a valid graph: {source}")]
    Graph {
        path: String,
        name: String,
        source: GraphError,
    },
}

/// A molecular graph together with the substructure matches recorded for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoleculeRecord {
    pub name: String,
    pub atoms: Vec<Atom>,
    #[serde(default)]
    pub bonds: Vec<Bond>,
    #[serde(default, rename = "match")]
    pub matches: Vec<MatchRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoleculeFile {
    #[serde(default, rename = "molecule")]
    pub molecules: Vec<MoleculeRecord>,
}

#[derive(Debug, Clone)]
pub struct LoadedMolecule {
    pub name: String,
    pub molecule: Molecule,
    pub matcher: TableMatcher,
}

impl MoleculeRecord {
    pub fn into_loaded(self) -> Result<LoadedMolecule, GraphError> {
        let molecule = Molecule::from_parts(self.atoms, self.bonds)?;
        Ok(LoadedMolecule {
            name: self.name,
            molecule,
            matcher: TableMatcher::from_records(self.matches),
        })
    }
}

pub fn parse_molecules(content: &str, path: &str) -> Result<Vec<LoadedMolecule>, MoleculeLoadError> {
    let file: MoleculeFile = toml::from_str(content).map_err(|e| MoleculeLoadError::Toml {
        path: path.to_string(),
        source: e,
    })?;
    file.molecules
        .into_iter()
        .map(|record| {
            let name = record.name.clone();
            record
                .into_loaded()
                .map_err(|source| MoleculeLoadError::Graph {
                    path: path.to_string(),
                    name,
                    source,
                })
        })
        .collect()
}

/// Reads every `[[molecule]]` entry of a TOML file, in file order.
pub fn load_molecules(path: &Path) -> Result<Vec<LoadedMolecule>, MoleculeLoadError> {
    let path_str = path.to_string_lossy().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| MoleculeLoadError::Io {
        path: path_str.clone(),
        source: e,
    })?;
    let molecules = parse_molecules(&content, &path_str)?;
    debug!("Read {} molecules from '{}'.", molecules.len(), path_str);
    Ok(molecules)
}
