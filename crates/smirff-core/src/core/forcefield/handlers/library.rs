use super::Handler;
use crate::core::forcefield::assignment::{AssignmentError, ChargeAssignment};
use crate::core::forcefield::definitions::LibraryChargeParameter;
use crate::core::models::graph::MolecularGraph;
use crate::core::smirks::matcher::SmirksMatcher;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct LibraryChargeSettings {}

impl Handler<LibraryChargeParameter> {
    /// Applies library charges from the highest-precedence definition down.
    ///
    /// A match is applied only if none of its atoms already received a library charge,
    /// so every atom is covered by at most one match. Within one definition, matches
    /// are visited in ascending tuple order.
    pub fn assign(
        &self,
        graph: &dyn MolecularGraph,
        matcher: &dyn SmirksMatcher,
    ) -> Result<Vec<ChargeAssignment>, AssignmentError> {
        let mut charged = vec![false; graph.num_atoms()];
        let mut assignments = Vec::new();

        for (position, parameter) in self.store().iter().enumerate().rev() {
            let mut tuples = self.matches(graph, matcher, parameter)?;
            tuples.sort_unstable();
            tuples.dedup();

            for tuple in tuples {
                if tuple.iter().any(|&atom| charged[atom]) {
                    debug!(
                        "Skipping library charge '{}' on {:?}: atoms already charged.",
                        parameter.id, tuple
                    );
                    continue;
                }
                for &atom in &tuple {
                    charged[atom] = true;
                }
                assignments.push(ChargeAssignment {
                    atoms: tuple,
                    parameter_id: parameter.id.clone(),
                    smirks: parameter.smirks.clone(),
                    position,
                    terms: parameter.charges.clone(),
                });
            }
        }
        Ok(assignments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::smirks::table::TableMatcher;
    use crate::test_utils::linear_triatomic;

    const WHOLE: &str = "[#8:1]-[#6:2]-[#7:3]";
    const FRAGMENT: &str = "[#8:1]-[#6:2]";

    fn library(order: [(&str, &str, Vec<f64>); 2]) -> Handler<LibraryChargeParameter> {
        Handler::with_parameters(
            LibraryChargeSettings::default(),
            order.map(|(id, smirks, charges)| LibraryChargeParameter {
                id: id.into(),
                smirks: smirks.into(),
                name: None,
                charges,
            }),
        )
        .unwrap()
    }

    fn matcher() -> TableMatcher {
        TableMatcher::new()
            .with(WHOLE, [vec![0, 1, 2]])
            .with(FRAGMENT, [vec![0, 1]])
    }

    #[test]
    fn highest_precedence_match_claims_atoms() {
        let handler = library([
            ("fragment", FRAGMENT, vec![-0.4, 0.4]),
            ("whole", WHOLE, vec![-0.5, 0.3, 0.2]),
        ]);
        let assignments = handler.assign(&linear_triatomic(), &matcher()).unwrap();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].parameter_id, "whole");
        assert_eq!(assignments[0].atoms, vec![0, 1, 2]);
    }

    #[test]
    fn lower_precedence_whole_molecule_match_is_skipped() {
        let handler = library([
            ("whole", WHOLE, vec![-0.5, 0.3, 0.2]),
            ("fragment", FRAGMENT, vec![-0.4, 0.4]),
        ]);
        let assignments = handler.assign(&linear_triatomic(), &matcher()).unwrap();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].parameter_id, "fragment");
        assert_eq!(assignments[0].terms, vec![-0.4, 0.4]);
    }
}
