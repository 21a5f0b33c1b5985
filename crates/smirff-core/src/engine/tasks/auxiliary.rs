use crate::core::forcefield::assignment::{BondAssignment, ConstraintAssignment, GbsaAssignment};
use crate::engine::context::ParameterizationContext;
use crate::engine::error::EngineError;
use crate::engine::state::ParameterizationStage;
use tracing::{debug, instrument};

/// Constraints and GBSA terms; both run in the constraints stage.
#[instrument(skip_all, name = "auxiliary_task")]
pub fn run(
    context: &ParameterizationContext,
    bonds: &[BondAssignment],
) -> Result<(Vec<ConstraintAssignment>, Vec<GbsaAssignment>), EngineError> {
    let fail = EngineError::in_stage(ParameterizationStage::MatchingConstraints);
    let constraints = match &context.forcefield.constraints {
        Some(handler) => handler
            .assign(context.graph, context.matcher, bonds)
            .map_err(&fail)?,
        None => Vec::new(),
    };
    let gbsa = match &context.forcefield.gbsa {
        Some(handler) => handler.assign(context.graph, context.matcher).map_err(&fail)?,
        None => Vec::new(),
    };
    debug!(
        "Assigned {} constraints and {} GBSA atoms.",
        constraints.len(),
        gbsa.len()
    );
    Ok((constraints, gbsa))
}
