//! # SMIRFF Core Library
//!
//! Assignment of SMIRKS-typed molecular-mechanics force-field parameters to molecular
//! graphs, producing simulation-ready bond, angle, torsion, van der Waals and
//! electrostatic terms.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Read-only molecular graphs, SMIRKS pattern handling
//!   and the matcher seam, typed parameter stores, the per-category handlers that
//!   resolve pattern precedence, bond-order interpolation, coverage validation, the
//!   `ForceField` aggregate, and serialization of force-field documents, molecule
//!   records and label tables.
//!
//! - **[`engine`]: The Logic Core.** The staged parameterization pass over one
//!   molecule, its configuration, progress reporting and system assembly.
//!
//! - **[`workflows`]: The Public API.** High-level entry points that run a pass over
//!   one or many molecules and hand back assembled systems.
//!
//! Substructure matching itself is not implemented here: every pass is written against
//! the [`core::smirks::SmirksMatcher`] trait, and cheminformatics toolkits plug in
//! behind it.

pub mod core;
pub mod engine;
pub mod workflows;

#[cfg(test)]
pub(crate) mod test_utils;
