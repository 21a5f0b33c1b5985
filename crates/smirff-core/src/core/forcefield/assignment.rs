use super::category::ParameterCategory;
use crate::core::smirks::matcher::MatchError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssignmentError {
    #[error("Matching {category} parameter '{id}' failed: {source}")]
    Matcher {
        category: ParameterCategory,
        id: String,
        #[source]
        source: MatchError,
    },
    #[error(
        "Matcher returned a {found}-atom tuple for {category} parameter '{id}' ('{smirks}'), expected {expected}"
    )]
    TupleArity {
        category: ParameterCategory,
        id: String,
        smirks: String,
        expected: usize,
        found: usize,
    },
    #[error(
        "Matcher returned atom {atom} for {category} parameter '{id}', but the graph has {len} atoms"
    )]
    AtomOutOfRange {
        category: ParameterCategory,
        id: String,
        atom: usize,
        len: usize,
    },
    #[error(
        "{category} parameter '{id}' is bond-order dependent but bond {bond:?} of unit {atoms:?} has no fractional bond order"
    )]
    MissingFractionalBondOrder {
        category: ParameterCategory,
        id: String,
        atoms: Vec<usize>,
        bond: [usize; 2],
    },
    /// Two simultaneous winners for one unit. Store order is total, so
    /// [`Handler`](super::handlers::Handler) only debug-asserts this; the variant stays in
    /// the public error set for callers that resolve definitions themselves.
    #[error(
        "{category} unit {atoms:?}: parameter '{earlier}' at position {earlier_position} would override '{later}' at position {later_position}"
    )]
    AssignmentAmbiguity {
        category: ParameterCategory,
        atoms: Vec<usize>,
        earlier: String,
        earlier_position: usize,
        later: String,
        later_position: usize,
    },
    #[error(
        "Constraint '{id}' on atoms {atoms:?} has no distance and the pair has no bond parameter"
    )]
    ConstraintDistanceUnavailable { id: String, atoms: [usize; 2] },
}

/// The outcome of parameterizing one structural unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Assignment<T> {
    /// Atom indices of the unit in canonical order.
    pub atoms: Vec<usize>,
    pub parameter_id: String,
    pub smirks: String,
    /// Position of the winning definition in its store.
    pub position: usize,
    pub terms: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BondTerms {
    pub length: f64,
    pub k: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AngleTerms {
    pub angle: f64,
    pub k: f64,
}

/// A resolved Fourier term; `k` has already been divided by `idivf`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TorsionTerm {
    pub periodicity: u32,
    pub phase: f64,
    pub k: f64,
    pub idivf: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct VdwTerms {
    pub epsilon: f64,
    pub sigma: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConstraintTerms {
    pub distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GbsaTerms {
    pub radius: f64,
    pub scale: f64,
}

pub type BondAssignment = Assignment<BondTerms>;
pub type AngleAssignment = Assignment<AngleTerms>;
pub type TorsionAssignment = Assignment<Vec<TorsionTerm>>;
pub type VdwAssignment = Assignment<VdwTerms>;
/// Charges (library) or increments (charge-increment model) per tagged atom.
pub type ChargeAssignment = Assignment<Vec<f64>>;
pub type ConstraintAssignment = Assignment<ConstraintTerms>;
pub type GbsaAssignment = Assignment<GbsaTerms>;

/// Per-category assignments of one molecule, in canonical unit order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Labels {
    pub bonds: Vec<BondAssignment>,
    pub angles: Vec<AngleAssignment>,
    pub proper_torsions: Vec<TorsionAssignment>,
    pub improper_torsions: Vec<TorsionAssignment>,
    pub vdw: Vec<VdwAssignment>,
    pub library_charges: Vec<ChargeAssignment>,
    pub charge_increments: Vec<ChargeAssignment>,
    pub constraints: Vec<ConstraintAssignment>,
    pub gbsa: Vec<GbsaAssignment>,
}

/// One row of a flattened label table.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRow<'a> {
    pub category: &'static str,
    pub atoms: String,
    pub parameter_id: &'a str,
    pub smirks: &'a str,
    pub position: usize,
}

impl Labels {
    /// Flattens every assignment into `(category, atoms, parameter)` rows in pass order.
    pub fn rows(&self) -> Vec<LabelRow<'_>> {
        fn push<'a, T>(
            rows: &mut Vec<LabelRow<'a>>,
            category: ParameterCategory,
            assignments: &'a [Assignment<T>],
        ) {
            rows.extend(assignments.iter().map(|a| LabelRow {
                category: category.name(),
                atoms: a
                    .atoms
                    .iter()
                    .map(usize::to_string)
                    .collect::<Vec<_>>()
                    .join(" "),
                parameter_id: &a.parameter_id,
                smirks: &a.smirks,
                position: a.position,
            }));
        }

        let mut rows = Vec::new();
        push(&mut rows, ParameterCategory::Bonds, &self.bonds);
        push(&mut rows, ParameterCategory::Angles, &self.angles);
        push(&mut rows, ParameterCategory::ProperTorsions, &self.proper_torsions);
        push(&mut rows, ParameterCategory::ImproperTorsions, &self.improper_torsions);
        push(&mut rows, ParameterCategory::Vdw, &self.vdw);
        push(&mut rows, ParameterCategory::LibraryCharges, &self.library_charges);
        push(&mut rows, ParameterCategory::ChargeIncrements, &self.charge_increments);
        push(&mut rows, ParameterCategory::Constraints, &self.constraints);
        push(&mut rows, ParameterCategory::Gbsa, &self.gbsa);
        rows
    }

    pub fn len(&self) -> usize {
        self.bonds.len()
            + self.angles.len()
            + self.proper_torsions.len()
            + self.improper_torsions.len()
            + self.vdw.len()
            + self.library_charges.len()
            + self.charge_increments.len()
            + self.constraints.len()
            + self.gbsa.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_flatten_categories_in_pass_order() {
        let labels = Labels {
            bonds: vec![Assignment {
                atoms: vec![0, 1],
                parameter_id: "b1".into(),
                smirks: "[#6:1]-[#6:2]".into(),
                position: 0,
                terms: BondTerms { length: 1.5, k: 600.0 },
            }],
            vdw: vec![Assignment {
                atoms: vec![0],
                parameter_id: "n1".into(),
                smirks: "[#6:1]".into(),
                position: 2,
                terms: VdwTerms {
                    epsilon: 0.1,
                    sigma: 3.4,
                },
            }],
            ..Default::default()
        };
        let rows = labels.rows();
        assert_eq!(labels.len(), 2);
        assert_eq!(rows[0].category, "Bonds");
        assert_eq!(rows[0].atoms, "0 1");
        assert_eq!(rows[1].category, "vdW");
        assert_eq!(rows[1].position, 2);
    }
}
