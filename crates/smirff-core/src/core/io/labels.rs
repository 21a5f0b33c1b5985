use crate::core::forcefield::assignment::Labels;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LabelWriteError {
    #[error("CSV writing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Serialize)]
struct LabelRecord<'a> {
    molecule: &'a str,
    category: &'a str,
    atoms: &'a str,
    parameter_id: &'a str,
    smirks: &'a str,
    position: usize,
}

/// Writes one CSV row per assignment, grouped by molecule and then by category.
pub fn write_labels<'a, W: Write>(
    writer: W,
    labels: impl IntoIterator<Item = (&'a str, &'a Labels)>,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    for (molecule, labels) in labels {
        for row in labels.rows() {
            writer.serialize(LabelRecord {
                molecule,
                category: row.category,
                atoms: &row.atoms,
                parameter_id: row.parameter_id,
                smirks: row.smirks,
                position: row.position,
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn write_labels_to_path<'a>(
    path: &Path,
    labels: impl IntoIterator<Item = (&'a str, &'a Labels)>,
) -> Result<(), LabelWriteError> {
    let path_str = path.to_string_lossy().to_string();
    let file = std::fs::File::create(path).map_err(|e| LabelWriteError::Io {
        path: path_str.clone(),
        source: e,
    })?;
    write_labels(std::io::BufWriter::new(file), labels).map_err(|e| LabelWriteError::Csv {
        path: path_str,
        source: e,
    })
}
