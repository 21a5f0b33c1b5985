//! The units of work of a parameterization pass.
//!
//! Each submodule runs the handlers of one or more stages against the pass context and
//! maps handler failures to an [`EngineError`](super::error::EngineError) that records
//! the stage. Categories without a registered handler yield no assignments.

pub mod auxiliary;
pub mod bonded;
pub mod coverage;
pub mod nonbonded;
