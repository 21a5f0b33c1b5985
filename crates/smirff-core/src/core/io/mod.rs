//! Reading and writing of force-field documents, molecule records and label tables.
//!
//! Force fields and molecules are stored as TOML; array order in a force-field
//! document is precedence order and is preserved on both load and save. Label tables
//! are written as CSV for inspection in spreadsheets and scripts.

pub mod forcefield;
pub mod labels;
pub mod molecule;
