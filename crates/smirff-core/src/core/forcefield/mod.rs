//! # Force Field Module
//!
//! Typed SMIRKS parameter definitions and the machinery that turns them into
//! per-unit assignments for one molecular graph.
//!
//! ## Overview
//!
//! A force field is an ordered collection of definitions grouped by category. Within
//! a category the definition that appears last wins for every structural unit it
//! matches; there is no specificity scoring. The module supports:
//!
//! - **Bonded terms** for bonds, angles, proper and improper torsions, with optional
//!   fractional bond-order interpolation
//! - **Nonbonded terms** for Lennard-Jones atom types and the electrostatics charge chain
//!   (library charges, bulk method, additive charge increments)
//! - **Auxiliary terms** for distance constraints and GBSA implicit solvent
//! - **Coverage validation** that aggregates every unparameterized unit into one error
//!
//! ## Key Components
//!
//! - [`definitions`] - Per-category definition types and their insertion invariants
//! - [`store`] - The ordered, key-addressable [`store::ParameterStore`]
//! - [`handlers`] - Settings plus store per category, and the precedence resolution
//! - [`interpolation`] - Two-anchor bond-order interpolation
//! - [`coverage`] - Gap collection across required categories
//! - [`params`] - The [`params::ForceField`] container
//!
//! ## Usage
//!
//! ```ignore
//! use smirff::core::forcefield::params::ForceField;
//!
//! let forcefield = ForceField::load(path)?;
//! let labels = forcefield.label(&molecule, &matcher)?;
//! ```

pub mod assignment;
pub mod category;
pub mod coverage;
pub mod definitions;
pub mod handlers;
pub mod interpolation;
pub mod params;
pub mod store;
