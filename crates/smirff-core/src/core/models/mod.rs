//! # Core Models Module
//!
//! Data structures describing the molecules that parameters are assigned to.
//!
//! The assignment engine treats molecules as opaque, already-validated graphs. These
//! models provide:
//!
//! - [`element`] - Chemical elements backed by a static symbol table
//! - [`atom`] - Atom properties visible to matchers (element, charge, aromaticity)
//! - [`topology`] - Bonds and bond orders, including fractional bond orders
//! - [`graph`] - The [`graph::MolecularGraph`] interface and the in-memory [`graph::Molecule`]
//! - [`units`] - Enumeration of bonds, angles and torsions and their symmetry rules
//!
//! ```ignore
//! use smirff::core::models::{atom::Atom, element::Element, graph::Molecule, topology::BondOrder};
//!
//! let mut molecule = Molecule::new();
//! let c = molecule.add_atom(Atom::new(Element::CARBON));
//! let h = molecule.add_atom(Atom::new(Element::HYDROGEN));
//! molecule.add_bond(c, h, BondOrder::Single)?;
//! ```

pub mod atom;
pub mod element;
pub mod graph;
pub mod topology;
pub mod units;
