//! # Core Module
//!
//! The stateless building blocks of parameter assignment.
//!
//! - **Molecular Representation** ([`models`]) - Elements, atoms, bonds and the read-only
//!   [`models::graph::MolecularGraph`] interface, plus structural unit enumeration
//! - **Pattern Handling** ([`smirks`]) - SMIRKS syntax checks and the matcher seam
//! - **Parameters** ([`forcefield`]) - Typed definitions, ordered stores, handlers,
//!   interpolation and coverage validation
//! - **File I/O** ([`io`]) - TOML force-field documents, molecule records and label tables

pub mod forcefield;
pub mod io;
pub mod models;
pub mod smirks;
