use super::config::ParameterizationConfig;
use super::progress::ProgressReporter;
use crate::core::forcefield::params::ForceField;
use crate::core::models::graph::MolecularGraph;
use crate::core::smirks::matcher::SmirksMatcher;

/// Everything one pass reads. The force field is borrowed immutably for the whole pass.
#[derive(Clone, Copy)]
pub struct ParameterizationContext<'a> {
    pub forcefield: &'a ForceField,
    pub graph: &'a dyn MolecularGraph,
    pub matcher: &'a dyn SmirksMatcher,
    pub reporter: &'a ProgressReporter<'a>,
    pub config: &'a ParameterizationConfig,
}

impl<'a> ParameterizationContext<'a> {
    pub fn new(
        forcefield: &'a ForceField,
        graph: &'a dyn MolecularGraph,
        matcher: &'a dyn SmirksMatcher,
        reporter: &'a ProgressReporter<'a>,
        config: &'a ParameterizationConfig,
    ) -> Self {
        Self {
            forcefield,
            graph,
            matcher,
            reporter,
            config,
        }
    }
}
