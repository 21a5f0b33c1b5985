use super::Handler;
use crate::core::forcefield::assignment::{AngleAssignment, AngleTerms, AssignmentError};
use crate::core::forcefield::definitions::AngleParameter;
use crate::core::models::graph::MolecularGraph;
use crate::core::smirks::matcher::SmirksMatcher;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct AngleSettings {
    pub potential: String,
}

impl Default for AngleSettings {
    fn default() -> Self {
        Self {
            potential: "harmonic".to_string(),
        }
    }
}

impl Handler<AngleParameter> {
    pub fn assign(
        &self,
        graph: &dyn MolecularGraph,
        matcher: &dyn SmirksMatcher,
    ) -> Result<Vec<AngleAssignment>, AssignmentError> {
        Ok(self
            .resolve(graph, matcher)?
            .into_iter()
            .map(|unit| AngleAssignment {
                atoms: unit.atoms,
                parameter_id: unit.parameter.id.clone(),
                smirks: unit.parameter.smirks.clone(),
                position: unit.position,
                terms: AngleTerms {
                    angle: unit.parameter.angle,
                    k: unit.parameter.k,
                },
            })
            .collect())
    }
}
