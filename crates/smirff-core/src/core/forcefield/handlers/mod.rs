//! Per-category parameter handlers.
//!
//! A [`Handler`] owns the settings and the ordered definitions of one category. The
//! generic [`Handler::resolve`] implements "last match in store order wins" over
//! canonicalized units; each category module adds its own `assign` on top of it.

pub mod angles;
pub mod bonds;
pub mod constraints;
pub mod electrostatics;
pub mod gbsa;
pub mod increments;
pub mod library;
pub mod torsions;
pub mod vdw;

use super::assignment::AssignmentError;
use super::definitions::Parameter;
use super::interpolation::BondOrderValue;
use super::store::{ParameterStore, StoreError};
use crate::core::models::graph::MolecularGraph;
use crate::core::smirks::matcher::{MatchError, SmirksMatcher};
use crate::core::smirks::pattern::SmirksPattern;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Handler<P: Parameter> {
    pub settings: P::Settings,
    store: ParameterStore<P>,
}

impl<P: Parameter> Default for Handler<P> {
    fn default() -> Self {
        Self::new(P::Settings::default())
    }
}

impl<P: Parameter + PartialEq> PartialEq for Handler<P> {
    fn eq(&self, other: &Self) -> bool {
        self.settings == other.settings && self.store == other.store
    }
}

/// The winning definition for one canonical unit.
#[derive(Debug)]
pub(crate) struct Resolved<'a, P> {
    pub atoms: Vec<usize>,
    pub position: usize,
    pub parameter: &'a P,
}

impl<P: Parameter> Handler<P> {
    pub fn new(settings: P::Settings) -> Self {
        Self {
            settings,
            store: ParameterStore::new(),
        }
    }

    /// Builds a handler from definitions in precedence order.
    pub fn with_parameters(
        settings: P::Settings,
        parameters: impl IntoIterator<Item = P>,
    ) -> Result<Self, StoreError> {
        let mut handler = Self::new(settings);
        for parameter in parameters {
            handler.store.add(parameter)?;
        }
        Ok(handler)
    }

    pub fn store(&self) -> &ParameterStore<P> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ParameterStore<P> {
        &mut self.store
    }

    pub fn add(&mut self, parameter: P) -> Result<usize, StoreError> {
        self.store.add(parameter)
    }

    /// Runs the matcher for one definition and checks every returned tuple.
    pub(crate) fn matches(
        &self,
        graph: &dyn MolecularGraph,
        matcher: &dyn SmirksMatcher,
        parameter: &P,
    ) -> Result<Vec<Vec<usize>>, AssignmentError> {
        let category = P::CATEGORY;
        let matcher_error = |source: MatchError| AssignmentError::Matcher {
            category,
            id: parameter.id().to_string(),
            source,
        };

        let expected = match category.tagged_atoms() {
            Some(n) => n,
            None => SmirksPattern::parse(parameter.smirks())
                .map_err(|e| matcher_error(e.into()))?
                .tagged_atoms(),
        };
        let tuples = matcher
            .find_matches(graph, parameter.smirks())
            .map_err(matcher_error)?;

        let len = graph.num_atoms();
        for tuple in &tuples {
            if tuple.len() != expected {
                return Err(AssignmentError::TupleArity {
                    category,
                    id: parameter.id().to_string(),
                    smirks: parameter.smirks().to_string(),
                    expected,
                    found: tuple.len(),
                });
            }
            if let Some(&atom) = tuple.iter().find(|&&atom| atom >= len) {
                return Err(AssignmentError::AtomOutOfRange {
                    category,
                    id: parameter.id().to_string(),
                    atom,
                    len,
                });
            }
        }
        Ok(tuples)
    }

    /// Resolves one winning definition per canonical unit.
    ///
    /// Definitions are visited in store order and a later match replaces an earlier one,
    /// so the result does not depend on the order in which the matcher reports tuples.
    /// Units are returned sorted by their canonical atom key.
    pub(crate) fn resolve(
        &self,
        graph: &dyn MolecularGraph,
        matcher: &dyn SmirksMatcher,
    ) -> Result<Vec<Resolved<'_, P>>, AssignmentError> {
        let symmetry = P::CATEGORY.symmetry();
        let mut winners: BTreeMap<Vec<usize>, Resolved<'_, P>> = BTreeMap::new();

        for (position, parameter) in self.store.iter().enumerate() {
            let tuples = self.matches(graph, matcher, parameter)?;
            debug!(
                "{} parameter '{}' matched {} tuples.",
                P::CATEGORY,
                parameter.id(),
                tuples.len()
            );

            for tuple in tuples {
                let atoms = symmetry.canonicalize(&tuple);
                if let Some(existing) = winners.get(&atoms) {
                    debug_assert!(
                        existing.position <= position,
                        "store positions are visited in increasing order"
                    );
                    if existing.position == position {
                        continue;
                    }
                }
                winners.insert(
                    atoms.clone(),
                    Resolved {
                        atoms,
                        position,
                        parameter,
                    },
                );
            }
        }
        Ok(winners.into_values().collect())
    }
}

/// Only linear interpolation between two anchors is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterpolationScheme {
    #[default]
    Linear,
}

/// Resolves a possibly bond-order dependent field on the bond `bond` of unit `atoms`.
pub(crate) fn resolve_field<P: Parameter>(
    graph: &dyn MolecularGraph,
    parameter: &P,
    atoms: &[usize],
    bond: [usize; 2],
    value: &BondOrderValue,
) -> Result<f64, AssignmentError> {
    let bond_order = if value.is_interpolated() {
        graph.fractional_bond_order(bond[0], bond[1])
    } else {
        None
    };
    value
        .resolve(bond_order)
        .ok_or_else(|| AssignmentError::MissingFractionalBondOrder {
            category: P::CATEGORY,
            id: parameter.id().to_string(),
            atoms: atoms.to_vec(),
            bond,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::definitions::AngleParameter;
    use crate::core::smirks::table::TableMatcher;
    use crate::test_utils::{ethane, linear_triatomic};

    fn angle(id: &str, smirks: &str) -> AngleParameter {
        AngleParameter {
            id: id.into(),
            smirks: smirks.into(),
            angle: 110.0,
            k: 100.0,
        }
    }

    fn handler() -> Handler<AngleParameter> {
        Handler::with_parameters(
            Default::default(),
            [
                angle("generic", "[*:1]~[*:2]~[*:3]"),
                angle("specific", "[#8:1]-[#6:2]-[#7:3]"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn resolve_picks_last_definition_regardless_of_matcher_order() {
        let mol = linear_triatomic();
        let forward = TableMatcher::new()
            .with("[*:1]~[*:2]~[*:3]", [vec![0, 1, 2]])
            .with("[#8:1]-[#6:2]-[#7:3]", [vec![0, 1, 2]]);
        let reversed = TableMatcher::new()
            .with("[*:1]~[*:2]~[*:3]", [vec![2, 1, 0]])
            .with("[#8:1]-[#6:2]-[#7:3]", [vec![0, 1, 2]]);

        let handler = handler();
        for matcher in [forward, reversed] {
            let resolved = handler.resolve(&mol, &matcher).unwrap();
            assert_eq!(resolved.len(), 1);
            assert_eq!(resolved[0].atoms, vec![0, 1, 2]);
            assert_eq!(resolved[0].parameter.id, "specific");
            assert_eq!(resolved[0].position, 1);
        }
    }

    #[test]
    fn resolve_collapses_symmetric_duplicates() {
        let mol = linear_triatomic();
        let matcher =
            TableMatcher::new().with("[*:1]~[*:2]~[*:3]", [vec![0, 1, 2], vec![2, 1, 0]]);
        let handler = handler();
        let resolved = handler.resolve(&mol, &matcher).unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].parameter.id, "generic");
        assert_eq!(resolved[0].atoms, vec![0, 1, 2]);
    }

    #[test]
    fn matches_rejects_wrong_arity_and_out_of_range_atoms() {
        let mol = linear_triatomic();
        let handler = handler();
        let short = TableMatcher::new().with("[*:1]~[*:2]~[*:3]", [vec![0, 1]]);
        assert!(matches!(
            handler.resolve(&mol, &short),
            Err(AssignmentError::TupleArity {
                expected: 3,
                found: 2,
                ..
            })
        ));
        let outside = TableMatcher::new().with("[*:1]~[*:2]~[*:3]", [vec![0, 1, 9]]);
        assert!(matches!(
            handler.resolve(&mol, &outside),
            Err(AssignmentError::AtomOutOfRange { atom: 9, len: 3, .. })
        ));
    }

    #[test]
    fn resolve_is_deterministic_across_runs() {
        let mol = ethane();
        let matcher = crate::test_utils::ethane_matcher();
        let handler = Handler::with_parameters(
            Default::default(),
            [
                angle("hch", crate::test_utils::HCH_ANGLE),
                angle("cch", crate::test_utils::CCH_ANGLE),
            ],
        )
        .unwrap();
        let first: Vec<_> = handler
            .resolve(&mol, &matcher)
            .unwrap()
            .into_iter()
            .map(|r| (r.atoms, r.position))
            .collect();
        let second: Vec<_> = handler
            .resolve(&mol, &matcher)
            .unwrap()
            .into_iter()
            .map(|r| (r.atoms, r.position))
            .collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 12);
    }
}
