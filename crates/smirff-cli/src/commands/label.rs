use super::{load_forcefield, read_molecules};
use crate::cli::LabelArgs;
use crate::error::{CliError, Result};
use smirff::core::forcefield::assignment::Labels;
use smirff::core::io::labels::write_labels_to_path;
use tracing::info;

pub fn run(args: LabelArgs) -> Result<()> {
    let forcefield = load_forcefield(&args.forcefield)?;
    let molecules = read_molecules(&args.molecules)?;

    let mut labeled: Vec<(String, Labels)> = Vec::with_capacity(molecules.len());
    for molecule in &molecules {
        let labels = forcefield
            .label(&molecule.molecule, &molecule.matcher)
            .map_err(|source| CliError::Labeling {
                name: molecule.name.clone(),
                source,
            })?;
        info!("Labeled {} units of '{}'.", labels.len(), molecule.name);
        labeled.push((molecule.name.clone(), labels));
    }

    let entries = labeled.iter().map(|(name, labels)| (name.as_str(), labels));
    match &args.csv {
        Some(path) => {
            write_labels_to_path(path, entries).map_err(|e| CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            })?;
            println!("✓ Labels written to: {}", path.display());
        }
        None => {
            for (name, labels) in entries {
                print!("{}", render_table(name, labels));
            }
        }
    }
    Ok(())
}

fn render_table(name: &str, labels: &Labels) -> String {
    let rows = labels.rows();
    let width = rows.iter().map(|row| row.atoms.len()).max().unwrap_or(0).max(5);
    let mut table = format!("{} ({} units)\n", name, rows.len());
    for row in rows {
        table.push_str(&format!(
            "  {:<18} {:<width$}  {:<10} {}\n",
            row.category, row.atoms, row.parameter_id, row.smirks
        ));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{WATER_FORCEFIELD, WATER_MOLECULES, write};
    use std::fs;

    #[test]
    fn csv_export_lists_every_assignment() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("labels.csv");
        run(LabelArgs {
            forcefield: vec![write(dir.path(), "ff.toml", WATER_FORCEFIELD)],
            molecules: write(dir.path(), "mols.toml", WATER_MOLECULES),
            csv: Some(csv.clone()),
        })
        .unwrap();

        let content = fs::read_to_string(csv).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "molecule,category,atoms,parameter_id,smirks,position");
        assert!(lines[1].starts_with("water,Bonds,0 1,b1,"));
        assert!(lines[3].starts_with("water,Angles,1 0 2,a1,"));
    }

    #[test]
    fn later_forcefield_overrides_earlier_definitions() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("labels.csv");
        let overlay = write(
            dir.path(),
            "overlay.toml",
            r#"
            [[bonds.parameter]]
            id = "b-tip3p"
            smirks = "[#1:1]-[#8:2]"
            length = 0.9572
            k = 1059.0
            "#,
        );
        run(LabelArgs {
            forcefield: vec![write(dir.path(), "ff.toml", WATER_FORCEFIELD), overlay],
            molecules: write(dir.path(), "mols.toml", WATER_MOLECULES),
            csv: Some(csv.clone()),
        })
        .unwrap();

        let content = fs::read_to_string(csv).unwrap();
        let bonds: Vec<&str> = content.lines().filter(|l| l.contains(",Bonds,")).collect();
        assert_eq!(bonds.len(), 2);
        assert!(bonds.iter().all(|l| l.contains(",b-tip3p,")));
        assert!(content.contains(",a1,"));
    }

    #[test]
    fn duplicate_ids_across_forcefields_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(LabelArgs {
            forcefield: vec![
                write(dir.path(), "ff.toml", WATER_FORCEFIELD),
                write(dir.path(), "copy.toml", WATER_FORCEFIELD),
            ],
            molecules: write(dir.path(), "mols.toml", WATER_MOLECULES),
            csv: None,
        });
        match result {
            Err(CliError::FileParsing { path, .. }) => assert!(path.ends_with("copy.toml")),
            other => panic!("expected a parse error for the second file, got {other:?}"),
        }
    }

    #[test]
    fn table_has_one_line_per_unit() {
        let table = render_table("empty", &Labels::default());
        assert_eq!(table, "empty (0 units)\n");
    }
}
