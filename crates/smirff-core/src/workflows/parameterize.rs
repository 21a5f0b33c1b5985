use crate::core::forcefield::assignment::Labels;
use crate::core::forcefield::params::ForceField;
use crate::core::models::graph::MolecularGraph;
use crate::core::smirks::matcher::SmirksMatcher;
use crate::engine::config::ParameterizationConfig;
use crate::engine::context::ParameterizationContext;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::ParameterizationStage;
use crate::engine::system::{Nonbonded, ParameterizedSystem, SystemParameters};
use crate::engine::tasks;
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Parameterizes one molecule.
///
/// The pass is a pure function of the force field, the graph and the matcher's answers:
/// the force field is only read, and a failure returns no partial result.
#[instrument(skip_all, name = "parameterize_workflow")]
pub fn run(
    forcefield: &ForceField,
    graph: &dyn MolecularGraph,
    matcher: &dyn SmirksMatcher,
    config: &ParameterizationConfig,
    reporter: &ProgressReporter,
) -> Result<ParameterizedSystem, EngineError> {
    let context = ParameterizationContext::new(forcefield, graph, matcher, reporter, config);
    let result = run_stages(&context);
    match &result {
        Ok(system) => info!(
            atoms = graph.num_atoms(),
            units = system.labels.len(),
            "Parameterization assembled."
        ),
        Err(e) => warn!(stage = %e.stage(), "Parameterization failed: {}", e),
    }
    result
}

fn run_stages(context: &ParameterizationContext) -> Result<ParameterizedSystem, EngineError> {
    // === Idle: optional eager pattern validation ===
    if context.config.validate_patterns {
        context.forcefield.validate_patterns(context.matcher)?;
    }

    let mut labels = Labels::default();

    labels.bonds = report_stage(context, ParameterizationStage::MatchingBonds, || {
        tasks::bonded::bonds(context)
    })?;
    labels.angles = report_stage(context, ParameterizationStage::MatchingAngles, || {
        tasks::bonded::angles(context)
    })?;
    (labels.proper_torsions, labels.improper_torsions) =
        report_stage(context, ParameterizationStage::MatchingTorsions, || {
            tasks::bonded::torsions(context)
        })?;
    labels.vdw = report_stage(context, ParameterizationStage::MatchingVdW, || {
        tasks::nonbonded::vdw(context)
    })?;
    let charges = report_stage(context, ParameterizationStage::MatchingElectrostatics, || {
        tasks::nonbonded::charges(context)
    })?;
    (labels.constraints, labels.gbsa) =
        report_stage(context, ParameterizationStage::MatchingConstraints, || {
            tasks::auxiliary::run(context, &labels.bonds)
        })?;

    let charges = match charges {
        Some(result) => {
            labels.library_charges = result.library;
            labels.charge_increments = result.increments;
            Some(result.charges)
        }
        None => None,
    };

    report_stage(context, ParameterizationStage::ValidatingCoverage, || {
        tasks::coverage::run(context, &labels, charges.as_deref())
    })?;

    let forcefield = context.forcefield;
    let nonbonded = Nonbonded {
        vdw: forcefield.vdw.as_ref().map(|handler| &handler.settings),
        electrostatics: forcefield.electrostatics.as_ref(),
        gbsa: forcefield.gbsa.as_ref().map(|handler| &handler.settings),
    };
    let parameters = SystemParameters::assemble(
        context.graph,
        &labels,
        charges.as_deref().unwrap_or_default(),
        nonbonded,
        context.config.generate_exceptions,
    );
    Ok(ParameterizedSystem { labels, parameters })
}

fn report_stage<T>(
    context: &ParameterizationContext,
    stage: ParameterizationStage,
    task: impl FnOnce() -> Result<T, EngineError>,
) -> Result<T, EngineError> {
    context.reporter.report(Progress::StageStart { name: stage.name() });
    let result = task();
    context.reporter.report(Progress::StageFinish);
    result
}

/// Parameterizes many independent molecules, in parallel when the `parallel` feature
/// is enabled. Results keep the input order.
///
/// Per-molecule stage events are not forwarded; the reporter receives one task step
/// per finished molecule.
#[instrument(skip_all, name = "parameterize_many_workflow")]
pub fn run_many<G, M>(
    forcefield: &ForceField,
    molecules: &[(&G, &M)],
    config: &ParameterizationConfig,
    reporter: &ProgressReporter,
) -> Vec<Result<ParameterizedSystem, EngineError>>
where
    G: MolecularGraph + Sync,
    M: SmirksMatcher + Sync,
{
    info!("Parameterizing {} molecules.", molecules.len());
    reporter.report(Progress::TaskStart {
        total_steps: molecules.len() as u64,
    });

    let silent = ProgressReporter::new();
    let one = |&(graph, matcher): &(&G, &M)| {
        let result = run(forcefield, graph, matcher, config, &silent);
        reporter.report(Progress::TaskIncrement);
        result
    };

    #[cfg(feature = "parallel")]
    let results: Vec<_> = molecules.par_iter().map(one).collect();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<_> = molecules.iter().map(one).collect();

    reporter.report(Progress::TaskFinish);
    results
}
