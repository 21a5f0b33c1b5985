//! # Engine Module
//!
//! The staged parameterization pass that turns a [`ForceField`](crate::core::forcefield::params::ForceField)
//! and one molecular graph into labels and simulation-ready parameters.
//!
//! ## Overview
//!
//! A pass walks a fixed sequence of stages (bonds, angles, torsions, vdW,
//! electrostatics, constraints, coverage) and either assembles a complete system or
//! fails with the stage that broke. There is no partial success: a failed pass returns
//! only the error.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Charge method and assembly options of a pass
//! - **Context** ([`context`]) - The borrowed inputs every task reads
//! - **State Tracking** ([`state`]) - The stage sequence and its terminal states
//! - **Progress Monitoring** ([`progress`]) - Stage and task events for front ends
//! - **Error Handling** ([`error`]) - Stage-aware engine errors
//! - **Tasks** ([`tasks`]) - Handler invocations grouped by stage
//! - **Assembly** ([`system`]) - Particles, bonded terms, constraints and scaled exceptions

pub mod config;
pub mod context;
pub mod error;
pub mod progress;
pub mod state;
pub mod system;
pub mod tasks;
