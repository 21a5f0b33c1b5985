pub mod check;
pub mod label;
pub mod parameterize;

use crate::error::{CliError, Result};
use smirff::core::forcefield::params::ForceField;
use smirff::core::io::molecule::{LoadedMolecule, load_molecules};
use std::path::{Path, PathBuf};
use tracing::info;

/// Loads each source in order and stacks it onto the ones before it.
pub(crate) fn load_forcefield(paths: &[PathBuf]) -> Result<ForceField> {
    let mut stacked: Option<ForceField> = None;
    for path in paths {
        info!("Loading force field from {:?}", path);
        let parse_error = |source: anyhow::Error| CliError::FileParsing {
            path: path.clone(),
            source,
        };
        let next = ForceField::load(path).map_err(|e| parse_error(e.into()))?;
        match stacked.as_mut() {
            Some(forcefield) => forcefield.merge(next).map_err(|e| parse_error(e.into()))?,
            None => stacked = Some(next),
        }
    }
    stacked.ok_or_else(|| CliError::Argument("No force-field source given.".to_string()))
}

pub(crate) fn read_molecules(path: &Path) -> Result<Vec<LoadedMolecule>> {
    info!("Loading molecules from {:?}", path);
    let molecules = load_molecules(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    if molecules.is_empty() {
        return Err(CliError::Argument(format!(
            "No molecules found in '{}'.",
            path.display()
        )));
    }
    Ok(molecules)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::fs;
    use std::path::{Path, PathBuf};

    pub const WATER_FORCEFIELD: &str = r#"
        version = "0.3"

        [[bonds.parameter]]
        id = "b1"
        smirks = "[#1:1]-[#8:2]"
        length = 0.9572
        k = 1106.0

        [[angles.parameter]]
        id = "a1"
        smirks = "[#1:1]-[#8:2]-[#1:3]"
        angle = 104.52
        k = 200.0

        [electrostatics]
    "#;

    pub const WATER_MOLECULES: &str = r#"
        [[molecule]]
        name = "water"
        atoms = [
            { element = "O", partial-charge = -0.834 },
            { element = "H", partial-charge = 0.417 },
            { element = "H", partial-charge = 0.417 },
        ]
        bonds = [{ atoms = [0, 1] }, { atoms = [0, 2] }]

        [[molecule.match]]
        smirks = "[#1:1]-[#8:2]"
        tuples = [[1, 0], [2, 0]]

        [[molecule.match]]
        smirks = "[#1:1]-[#8:2]-[#1:3]"
        tuples = [[1, 0, 2]]
    "#;

    pub fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }
}
