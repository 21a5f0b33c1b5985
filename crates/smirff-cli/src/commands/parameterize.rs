use super::{load_forcefield, read_molecules};
use crate::cli::ParameterizeArgs;
use crate::config::PartialParameterizeConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use serde::Serialize;
use smirff::core::forcefield::assignment::Labels;
use smirff::core::models::graph::Molecule;
use smirff::core::smirks::table::TableMatcher;
use smirff::engine::progress::ProgressReporter;
use smirff::engine::system::{ParameterizedSystem, SystemParameters};
use smirff::workflows;
use std::path::Path;
use tracing::{error, info};

#[derive(Serialize)]
struct ParameterizedOutput<'a> {
    #[serde(rename = "molecule")]
    molecules: Vec<MoleculeOutput<'a>>,
}

#[derive(Serialize)]
struct MoleculeOutput<'a> {
    name: &'a str,
    parameters: &'a SystemParameters,
    labels: &'a Labels,
}

pub fn run(args: ParameterizeArgs) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialParameterizeConfig::from_file(path)?,
        None => PartialParameterizeConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;

    let forcefield = load_forcefield(&args.forcefield)?;
    let molecules = read_molecules(&args.molecules)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Parameterizing {} molecule(s)...", molecules.len());
    info!(
        "Invoking the core parameterization workflow with {} charges.",
        config.bulk_charge_method
    );

    let results = if let [single] = molecules.as_slice() {
        vec![workflows::parameterize::run(
            &forcefield,
            &single.molecule,
            &single.matcher,
            &config,
            &reporter,
        )]
    } else {
        let inputs: Vec<(&Molecule, &TableMatcher)> = molecules
            .iter()
            .map(|m| (&m.molecule, &m.matcher))
            .collect();
        workflows::parameterize::run_many(&forcefield, &inputs, &config, &reporter)
    };

    let mut succeeded: Vec<(&str, ParameterizedSystem)> = Vec::with_capacity(results.len());
    let mut failed: Vec<&str> = Vec::new();
    for (molecule, result) in molecules.iter().zip(results) {
        match result {
            Ok(system) => succeeded.push((molecule.name.as_str(), system)),
            Err(e) => {
                failed.push(molecule.name.as_str());
                error!("Molecule '{}' failed in {}: {}", molecule.name, e.stage(), e);
                eprintln!("✗ {}: {}", molecule.name, e);
            }
        }
    }
    progress_handler.finish_with_outcome(succeeded.len(), &failed);

    if !succeeded.is_empty() {
        write_output(&args.output, &succeeded)?;
        println!(
            "✓ {} parameterized system(s) written to: {}",
            succeeded.len(),
            args.output.display()
        );
    }

    if !failed.is_empty() {
        return Err(CliError::MoleculesFailed {
            failed: failed.len(),
            total: molecules.len(),
        });
    }
    Ok(())
}

fn write_output(path: &Path, systems: &[(&str, ParameterizedSystem)]) -> Result<()> {
    let output = ParameterizedOutput {
        molecules: systems
            .iter()
            .map(|(name, system)| MoleculeOutput {
                name: *name,
                parameters: &system.parameters,
                labels: &system.labels,
            })
            .collect(),
    };
    let content = toml::to_string(&output).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    info!("Writing {} system(s) to {:?}", systems.len(), path);
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::commands::fixtures::{WATER_FORCEFIELD, WATER_MOLECULES, write};
    use clap::Parser;
    use std::fs;

    fn args(forcefield: &Path, molecules: &Path, output: &Path, extra: &[&str]) -> ParameterizeArgs {
        let mut argv = vec![
            "smirff".to_string(),
            "parameterize".to_string(),
            "-f".to_string(),
            forcefield.display().to_string(),
            "-m".to_string(),
            molecules.display().to_string(),
            "-o".to_string(),
            output.display().to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        match Cli::parse_from(argv).command {
            Commands::Parameterize(args) => args,
            other => panic!("expected 'parameterize', got {other:?}"),
        }
    }

    #[test]
    fn water_is_written_as_toml() {
        let dir = tempfile::tempdir().unwrap();
        let forcefield = write(dir.path(), "ff.toml", WATER_FORCEFIELD);
        let molecules = write(dir.path(), "mols.toml", WATER_MOLECULES);
        let output = dir.path().join("out.toml");

        run(args(&forcefield, &molecules, &output, &[])).unwrap();

        let written: toml::Value = toml::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        let molecule = &written["molecule"].as_array().unwrap()[0];
        assert_eq!(molecule["name"].as_str(), Some("water"));
        let parameters = &molecule["parameters"];
        assert_eq!(parameters["particles"].as_array().unwrap().len(), 3);
        assert_eq!(parameters["bonds"].as_array().unwrap().len(), 2);
        assert_eq!(parameters["angles"].as_array().unwrap().len(), 1);
        // Two bonded pairs and the H-H 1-3 pair.
        assert_eq!(parameters["exceptions"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn exceptions_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let forcefield = write(dir.path(), "ff.toml", WATER_FORCEFIELD);
        let molecules = write(dir.path(), "mols.toml", WATER_MOLECULES);
        let output = dir.path().join("out.toml");

        run(args(&forcefield, &molecules, &output, &["--no-exceptions"])).unwrap();

        let written: toml::Value = toml::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        let parameters = &written["molecule"].as_array().unwrap()[0]["parameters"];
        assert!(parameters["exceptions"].as_array().unwrap().is_empty());
    }

    #[test]
    fn uncovered_molecules_fail_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let forcefield = write(dir.path(), "ff.toml", WATER_FORCEFIELD);
        let molecules = write(
            dir.path(),
            "mols.toml",
            r#"
            [[molecule]]
            name = "peroxide"
            atoms = [{ element = "O" }, { element = "O" }]
            bonds = [{ atoms = [0, 1] }]
            "#,
        );
        let output = dir.path().join("out.toml");

        let result = run(args(&forcefield, &molecules, &output, &[]));
        assert!(matches!(
            result,
            Err(CliError::MoleculesFailed { failed: 1, total: 1 })
        ));
        assert!(!output.exists());
    }
}
