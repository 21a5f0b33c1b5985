use crate::core::forcefield::assignment::Labels;
use crate::core::forcefield::category::ParameterCategory;
use crate::core::forcefield::coverage::CoverageValidator;
use crate::engine::context::ParameterizationContext;
use crate::engine::error::EngineError;
use tracing::{instrument, warn};

/// Checks that every required unit received a parameter.
///
/// Bonds, angles and proper torsions are always required. vdW terms and charges are
/// required per atom when their sections are registered.
#[instrument(skip_all, name = "coverage_task")]
pub fn run(
    context: &ParameterizationContext,
    labels: &Labels,
    charges: Option<&[Option<f64>]>,
) -> Result<(), EngineError> {
    let forcefield = context.forcefield;
    let mut validator = CoverageValidator::new(context.graph);
    validator
        .check_bonds(&labels.bonds)
        .check_angles(&labels.angles)
        .check_proper_torsions(&labels.proper_torsions);
    if forcefield.is_registered(ParameterCategory::Vdw) {
        validator.check_atoms(ParameterCategory::Vdw, &labels.vdw);
    }
    if forcefield.is_registered(ParameterCategory::Electrostatics) {
        let uncharged = vec![None; context.graph.num_atoms()];
        validator.check_charges(charges.unwrap_or(&uncharged[..]));
    }

    if !validator.gaps().is_empty() {
        warn!("{} structural units lack parameters.", validator.gaps().len());
    }
    validator.finish()?;
    Ok(())
}
