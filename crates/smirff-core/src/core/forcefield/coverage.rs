use super::assignment::Assignment;
use super::category::ParameterCategory;
use crate::core::models::graph::MolecularGraph;
use crate::core::models::units;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// A structural unit that no definition parameterized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CoverageGap {
    pub category: ParameterCategory,
    pub atoms: Vec<usize>,
    pub elements: Vec<String>,
}

impl fmt::Display for CoverageGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let atoms: Vec<String> = self.atoms.iter().map(usize::to_string).collect();
        write!(
            f,
            "{} ({}) [{}]",
            self.category,
            atoms.join(", "),
            self.elements.join("-")
        )
    }
}

/// Every unparameterized unit of one molecule, reported together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterizationIncomplete {
    pub gaps: Vec<CoverageGap>,
}

impl fmt::Display for ParameterizationIncomplete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} structural units lack parameters:", self.gaps.len())?;
        for gap in &self.gaps {
            write!(f, "\n  {gap}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParameterizationIncomplete {}

impl ParameterizationIncomplete {
    pub fn in_category(&self, category: ParameterCategory) -> impl Iterator<Item = &CoverageGap> {
        self.gaps.iter().filter(move |gap| gap.category == category)
    }
}

/// Collects coverage gaps across categories of one molecule.
pub struct CoverageValidator<'a> {
    graph: &'a dyn MolecularGraph,
    gaps: Vec<CoverageGap>,
}

impl<'a> CoverageValidator<'a> {
    pub fn new(graph: &'a dyn MolecularGraph) -> Self {
        Self {
            graph,
            gaps: Vec::new(),
        }
    }

    /// Records every unit of `expected` without an assignment. Both sides are
    /// canonical atom keys.
    pub fn check<T>(
        &mut self,
        category: ParameterCategory,
        expected: &[Vec<usize>],
        assignments: &[Assignment<T>],
    ) -> &mut Self {
        let assigned: HashSet<&[usize]> = assignments.iter().map(|a| a.atoms.as_slice()).collect();
        for unit in expected {
            if !assigned.contains(unit.as_slice()) {
                self.push(category, unit.clone());
            }
        }
        self
    }

    pub fn check_bonds<T>(&mut self, assignments: &[Assignment<T>]) -> &mut Self {
        let expected = units::bonds(self.graph);
        self.check(ParameterCategory::Bonds, &expected, assignments)
    }

    pub fn check_angles<T>(&mut self, assignments: &[Assignment<T>]) -> &mut Self {
        let expected = units::angles(self.graph);
        self.check(ParameterCategory::Angles, &expected, assignments)
    }

    pub fn check_proper_torsions<T>(&mut self, assignments: &[Assignment<T>]) -> &mut Self {
        let expected = units::proper_torsions(self.graph);
        self.check(ParameterCategory::ProperTorsions, &expected, assignments)
    }

    pub fn check_atoms<T>(
        &mut self,
        category: ParameterCategory,
        assignments: &[Assignment<T>],
    ) -> &mut Self {
        let expected = units::atoms(self.graph);
        self.check(category, &expected, assignments)
    }

    /// Records every atom whose charge is missing.
    pub fn check_charges(&mut self, charges: &[Option<f64>]) -> &mut Self {
        for (atom, charge) in charges.iter().enumerate() {
            if charge.is_none() {
                self.push(ParameterCategory::Electrostatics, vec![atom]);
            }
        }
        self
    }

    pub fn gaps(&self) -> &[CoverageGap] {
        &self.gaps
    }

    pub fn finish(self) -> Result<(), ParameterizationIncomplete> {
        if self.gaps.is_empty() {
            Ok(())
        } else {
            Err(ParameterizationIncomplete { gaps: self.gaps })
        }
    }

    fn push(&mut self, category: ParameterCategory, atoms: Vec<usize>) {
        let elements = atoms
            .iter()
            .map(|&atom| {
                self.graph
                    .element(atom)
                    .map_or_else(|| "?".to_string(), |e| e.symbol().to_string())
            })
            .collect();
        self.gaps.push(CoverageGap {
            category,
            atoms,
            elements,
        });
    }
}
