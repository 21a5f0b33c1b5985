use super::Handler;
use crate::core::forcefield::assignment::{
    AssignmentError, BondAssignment, ConstraintAssignment, ConstraintTerms,
};
use crate::core::forcefield::definitions::ConstraintParameter;
use crate::core::models::graph::MolecularGraph;
use crate::core::smirks::matcher::SmirksMatcher;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConstraintSettings {}

impl Handler<ConstraintParameter> {
    /// Assigns constraints. A definition without a distance constrains the pair to the
    /// equilibrium length of its bond assignment.
    pub fn assign(
        &self,
        graph: &dyn MolecularGraph,
        matcher: &dyn SmirksMatcher,
        bonds: &[BondAssignment],
    ) -> Result<Vec<ConstraintAssignment>, AssignmentError> {
        self.resolve(graph, matcher)?
            .into_iter()
            .map(|unit| {
                let pair = [unit.atoms[0], unit.atoms[1]];
                let distance = match unit.parameter.distance {
                    Some(distance) => distance,
                    None => bonds
                        .iter()
                        .find(|bond| bond.atoms == pair)
                        .map(|bond| bond.terms.length)
                        .ok_or_else(|| AssignmentError::ConstraintDistanceUnavailable {
                            id: unit.parameter.id.clone(),
                            atoms: pair,
                        })?,
                };
                Ok(ConstraintAssignment {
                    atoms: unit.atoms,
                    parameter_id: unit.parameter.id.clone(),
                    smirks: unit.parameter.smirks.clone(),
                    position: unit.position,
                    terms: ConstraintTerms { distance },
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::assignment::BondTerms;
    use crate::core::smirks::table::TableMatcher;
    use crate::test_utils::{CH_BOND, ethane};

    const HH: &str = "[#1:1]-[#6X4]-[#1:2]";

    fn bond(atoms: [usize; 2], length: f64) -> BondAssignment {
        BondAssignment {
            atoms: atoms.to_vec(),
            parameter_id: "b".into(),
            smirks: CH_BOND.into(),
            position: 0,
            terms: BondTerms { length, k: 680.0 },
        }
    }

    fn handler(distance: Option<f64>, smirks: &str) -> Handler<ConstraintParameter> {
        Handler::with_parameters(
            ConstraintSettings::default(),
            [ConstraintParameter {
                id: "c1".into(),
                smirks: smirks.into(),
                distance,
            }],
        )
        .unwrap()
    }

    #[test]
    fn missing_distance_falls_back_to_bond_length() {
        let matcher = TableMatcher::new().with(CH_BOND, [vec![2, 0]]);
        let assignments = handler(None, CH_BOND)
            .assign(&ethane(), &matcher, &[bond([0, 2], 1.09)])
            .unwrap();
        assert_eq!(assignments[0].atoms, vec![0, 2]);
        assert_eq!(assignments[0].terms.distance, 1.09);
    }

    #[test]
    fn explicit_distance_wins() {
        let matcher = TableMatcher::new().with(HH, [vec![2, 3]]);
        let assignments = handler(Some(1.78), HH)
            .assign(&ethane(), &matcher, &[])
            .unwrap();
        assert_eq!(assignments[0].terms.distance, 1.78);
    }

    #[test]
    fn unbonded_pair_without_distance_fails() {
        let matcher = TableMatcher::new().with(HH, [vec![2, 3]]);
        assert_eq!(
            handler(None, HH).assign(&ethane(), &matcher, &[]),
            Err(AssignmentError::ConstraintDistanceUnavailable {
                id: "c1".into(),
                atoms: [2, 3]
            })
        );
    }
}
