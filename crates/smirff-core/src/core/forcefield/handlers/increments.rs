use super::Handler;
use super::electrostatics::BulkChargeMethod;
use crate::core::forcefield::assignment::{AssignmentError, ChargeAssignment};
use crate::core::forcefield::definitions::ChargeIncrementParameter;
use crate::core::models::graph::MolecularGraph;
use crate::core::smirks::matcher::SmirksMatcher;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct ChargeIncrementSettings {
    /// Base charges the increments are added to. Overrides the pass configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_charge_method: Option<BulkChargeMethod>,
}

impl Handler<ChargeIncrementParameter> {
    /// Collects the increments to apply, in store order.
    ///
    /// Unlike other categories every definition applies, and increments from
    /// different definitions on the same atom add up. When one definition matches the
    /// same atom set in several orientations, each orientation carries an equal share
    /// of the increments, so symmetry-equivalent atoms end up with equal charges
    /// whatever their numbering. Matches touching an atom in `excluded` are skipped.
    pub fn assign(
        &self,
        graph: &dyn MolecularGraph,
        matcher: &dyn SmirksMatcher,
        excluded: &[bool],
    ) -> Result<Vec<ChargeAssignment>, AssignmentError> {
        let mut assignments = Vec::new();
        for (position, parameter) in self.store().iter().enumerate() {
            let mut orientations: BTreeMap<Vec<usize>, Vec<Vec<usize>>> = BTreeMap::new();
            for tuple in self.matches(graph, matcher, parameter)? {
                let mut atom_set = tuple.clone();
                atom_set.sort_unstable();
                let seen = orientations.entry(atom_set).or_default();
                if !seen.contains(&tuple) {
                    seen.push(tuple);
                }
            }

            for (atom_set, mut tuples) in orientations {
                if atom_set
                    .iter()
                    .any(|&atom| excluded.get(atom).copied().unwrap_or(false))
                {
                    warn!(
                        "Charge increment '{}' on {:?} overlaps library-charged atoms and is skipped.",
                        parameter.id, atom_set
                    );
                    continue;
                }
                tuples.sort_unstable();
                let share = 1.0 / tuples.len() as f64;
                let terms: Vec<f64> = parameter.increments.iter().map(|q| q * share).collect();
                for tuple in tuples {
                    assignments.push(ChargeAssignment {
                        atoms: tuple,
                        parameter_id: parameter.id.clone(),
                        smirks: parameter.smirks.clone(),
                        position,
                        terms: terms.clone(),
                    });
                }
            }
        }
        Ok(assignments)
    }
}
