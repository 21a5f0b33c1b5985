use super::{Handler, InterpolationScheme, resolve_field};
use crate::core::forcefield::assignment::{AssignmentError, BondAssignment, BondTerms};
use crate::core::forcefield::definitions::BondParameter;
use crate::core::models::graph::MolecularGraph;
use crate::core::smirks::matcher::SmirksMatcher;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct BondSettings {
    pub potential: String,
    /// Name of the external method that produced the fractional bond orders.
    pub fractional_bondorder_method: String,
    pub fractional_bondorder_interpolation: InterpolationScheme,
}

impl Default for BondSettings {
    fn default() -> Self {
        Self {
            potential: "harmonic".to_string(),
            fractional_bondorder_method: "AM1-Wiberg".to_string(),
            fractional_bondorder_interpolation: InterpolationScheme::Linear,
        }
    }
}

impl Handler<BondParameter> {
    pub fn assign(
        &self,
        graph: &dyn MolecularGraph,
        matcher: &dyn SmirksMatcher,
    ) -> Result<Vec<BondAssignment>, AssignmentError> {
        self.resolve(graph, matcher)?
            .into_iter()
            .map(|unit| {
                let bond = [unit.atoms[0], unit.atoms[1]];
                let p = unit.parameter;
                let length = resolve_field(graph, p, &unit.atoms, bond, &p.length)?;
                let k = resolve_field(graph, p, &unit.atoms, bond, &p.k)?;
                Ok(BondAssignment {
                    atoms: unit.atoms,
                    parameter_id: p.id.clone(),
                    smirks: p.smirks.clone(),
                    position: unit.position,
                    terms: BondTerms { length, k },
                })
            })
            .collect()
    }
}
