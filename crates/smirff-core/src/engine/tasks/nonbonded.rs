use crate::core::forcefield::assignment::VdwAssignment;
use crate::core::forcefield::handlers::electrostatics::{ChargeResult, assign_charges};
use crate::engine::context::ParameterizationContext;
use crate::engine::error::EngineError;
use crate::engine::state::ParameterizationStage;
use tracing::{debug, instrument, warn};

#[instrument(skip_all, name = "vdw_task")]
pub fn vdw(context: &ParameterizationContext) -> Result<Vec<VdwAssignment>, EngineError> {
    let Some(handler) = &context.forcefield.vdw else {
        debug!("No vdW handler registered.");
        return Ok(Vec::new());
    };
    handler
        .assign(context.graph, context.matcher)
        .map_err(EngineError::in_stage(ParameterizationStage::MatchingVdW))
}

/// Runs the charge chain when electrostatics or any charge model is registered.
#[instrument(skip_all, name = "charges_task")]
pub fn charges(context: &ParameterizationContext) -> Result<Option<ChargeResult>, EngineError> {
    let forcefield = context.forcefield;
    if forcefield.electrostatics.is_none()
        && forcefield.library_charges.is_none()
        && forcefield.charge_increments.is_none()
    {
        debug!("No electrostatics registered; skipping charge assignment.");
        return Ok(None);
    }
    if forcefield.electrostatics.is_none() {
        warn!("Charge models are registered without an electrostatics section; charges will not be validated.");
    }

    let result = assign_charges(
        context.graph,
        context.matcher,
        forcefield.library_charges.as_ref(),
        forcefield.charge_increments.as_ref(),
        context.config.bulk_charge_method,
    )
    .map_err(EngineError::in_stage(ParameterizationStage::MatchingElectrostatics))?;
    debug!(
        library = result.library.len(),
        increments = result.increments.len(),
        uncharged = result.uncharged_atoms().count(),
        "Charge assignment complete."
    );
    Ok(Some(result))
}
