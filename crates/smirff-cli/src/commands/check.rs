use super::{load_forcefield, read_molecules};
use crate::cli::CheckArgs;
use crate::error::{CliError, Result};
use smirff::core::forcefield::category::ParameterCategory;
use tracing::{info, warn};

pub fn run(args: CheckArgs) -> Result<()> {
    let forcefield = load_forcefield(&args.forcefield)?;

    println!(
        "Force field v{} ({} aromaticity), {} parameter definitions:",
        forcefield.version,
        forcefield.aromaticity_model,
        forcefield.num_definitions()
    );
    let definitions = forcefield.definitions();
    for category in ParameterCategory::ALL {
        if !forcefield.is_registered(category) {
            continue;
        }
        let count = definitions.iter().filter(|(c, _, _)| *c == category).count();
        println!("  {:<20} {}", category.name(), count);
    }

    let Some(path) = args.molecules else {
        return Ok(());
    };
    let molecules = read_molecules(&path)?;
    let mut failed = 0;
    for molecule in &molecules {
        match forcefield.validate_patterns(&molecule.matcher) {
            Ok(()) => info!("All patterns accepted for '{}'.", molecule.name),
            Err(e) => {
                failed += 1;
                warn!("Pattern validation failed for '{}': {}", molecule.name, e);
                println!("✗ {}: {}", molecule.name, e);
                for failure in &e.failures {
                    println!("    {}", failure);
                }
            }
        }
    }

    if failed > 0 {
        return Err(CliError::MoleculesFailed {
            failed,
            total: molecules.len(),
        });
    }
    println!("✓ All patterns accepted for {} molecule(s).", molecules.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{WATER_FORCEFIELD, WATER_MOLECULES, write};

    #[test]
    fn valid_forcefield_passes_without_molecules() {
        let dir = tempfile::tempdir().unwrap();
        let forcefield = write(dir.path(), "ff.toml", WATER_FORCEFIELD);
        assert!(run(CheckArgs {
            forcefield: vec![forcefield],
            molecules: None,
        })
        .is_ok());
    }

    #[test]
    fn patterns_are_checked_against_recorded_matchers() {
        let dir = tempfile::tempdir().unwrap();
        let forcefield = write(dir.path(), "ff.toml", WATER_FORCEFIELD);
        let molecules = write(dir.path(), "mols.toml", WATER_MOLECULES);
        assert!(run(CheckArgs {
            forcefield: vec![forcefield],
            molecules: Some(molecules),
        })
        .is_ok());
    }

    #[test]
    fn unreadable_forcefield_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let forcefield = write(dir.path(), "ff.toml", "[[bonds.parameter]]\nid = 1\n");
        assert!(matches!(
            run(CheckArgs {
                forcefield: vec![forcefield],
                molecules: None,
            }),
            Err(CliError::FileParsing { .. })
        ));
    }
}
