use crate::core::forcefield::assignment::{AngleAssignment, BondAssignment, TorsionAssignment};
use crate::engine::context::ParameterizationContext;
use crate::engine::error::EngineError;
use crate::engine::state::ParameterizationStage;
use tracing::{debug, instrument};

#[instrument(skip_all, name = "bonds_task")]
pub fn bonds(context: &ParameterizationContext) -> Result<Vec<BondAssignment>, EngineError> {
    let Some(handler) = &context.forcefield.bonds else {
        debug!("No bond handler registered.");
        return Ok(Vec::new());
    };
    let assignments = handler
        .assign(context.graph, context.matcher)
        .map_err(EngineError::in_stage(ParameterizationStage::MatchingBonds))?;
    debug!("Assigned {} bonds.", assignments.len());
    Ok(assignments)
}

#[instrument(skip_all, name = "angles_task")]
pub fn angles(context: &ParameterizationContext) -> Result<Vec<AngleAssignment>, EngineError> {
    let Some(handler) = &context.forcefield.angles else {
        debug!("No angle handler registered.");
        return Ok(Vec::new());
    };
    let assignments = handler
        .assign(context.graph, context.matcher)
        .map_err(EngineError::in_stage(ParameterizationStage::MatchingAngles))?;
    debug!("Assigned {} angles.", assignments.len());
    Ok(assignments)
}

/// Proper and improper torsions, in that order.
#[instrument(skip_all, name = "torsions_task")]
pub fn torsions(
    context: &ParameterizationContext,
) -> Result<(Vec<TorsionAssignment>, Vec<TorsionAssignment>), EngineError> {
    let fail = EngineError::in_stage(ParameterizationStage::MatchingTorsions);
    let propers = match &context.forcefield.proper_torsions {
        Some(handler) => handler.assign(context.graph, context.matcher).map_err(&fail)?,
        None => Vec::new(),
    };
    let impropers = match &context.forcefield.improper_torsions {
        Some(handler) => handler.assign(context.graph, context.matcher).map_err(&fail)?,
        None => Vec::new(),
    };
    debug!(
        "Assigned {} proper and {} improper torsion units.",
        propers.len(),
        impropers.len()
    );
    Ok((propers, impropers))
}
