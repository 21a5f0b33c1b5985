use super::{Handler, InterpolationScheme, resolve_field};
use crate::core::forcefield::assignment::{AssignmentError, TorsionAssignment, TorsionTerm};
use crate::core::forcefield::definitions::{
    FourierTerm, ImproperTorsionParameter, Parameter, ProperTorsionParameter,
};
use crate::core::models::graph::MolecularGraph;
use crate::core::models::units::torsion_multiplicity;
use crate::core::smirks::matcher::SmirksMatcher;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_TORSION_POTENTIAL: &str = "k*(1+cos(periodicity*theta-phase))";

/// How the division factor of a torsion term is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawIdivf", into = "RawIdivf")]
pub enum IdivfPolicy {
    /// Computed from the topology; per-term values are ignored.
    #[default]
    Auto,
    /// Used for every term that does not carry its own `idivf`.
    Fixed(f64),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid idivf '{0}': expected \"auto\" or a positive number")]
pub struct ParseIdivfError(pub String);

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawIdivf {
    Number(f64),
    Text(String),
}

impl TryFrom<RawIdivf> for IdivfPolicy {
    type Error = ParseIdivfError;

    fn try_from(raw: RawIdivf) -> Result<Self, Self::Error> {
        match raw {
            RawIdivf::Number(value) if value.is_finite() && value > 0.0 => Ok(Self::Fixed(value)),
            RawIdivf::Number(value) => Err(ParseIdivfError(value.to_string())),
            RawIdivf::Text(text) => text.parse(),
        }
    }
}

impl From<IdivfPolicy> for RawIdivf {
    fn from(policy: IdivfPolicy) -> Self {
        match policy {
            IdivfPolicy::Auto => RawIdivf::Text("auto".to_string()),
            IdivfPolicy::Fixed(value) => RawIdivf::Number(value),
        }
    }
}

impl FromStr for IdivfPolicy {
    type Err = ParseIdivfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        match s.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => Ok(Self::Fixed(value)),
            _ => Err(ParseIdivfError(s.to_string())),
        }
    }
}

impl fmt::Display for IdivfPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Fixed(value) => write!(f, "{value}"),
        }
    }
}

impl IdivfPolicy {
    fn divisor(&self, term: &FourierTerm, auto: usize) -> f64 {
        match self {
            Self::Auto => auto.max(1) as f64,
            Self::Fixed(value) => term.idivf.unwrap_or(*value),
        }
    }
}

/// How many torsion units one matched improper center produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImproperExpansion {
    /// One unit per cyclic arrangement of the three peripheral atoms.
    #[default]
    Threefold,
    /// A single unit per center.
    Single,
}

impl ImproperExpansion {
    /// Expands a canonical improper key `[center, p0, p1, p2]` into torsion units.
    ///
    /// Each unit lists the central atom second: `(p_i, center, p_j, p_k)` for the
    /// cyclic orders `(0, 1, 2)`, `(1, 2, 0)` and `(2, 0, 1)`.
    pub fn units(&self, key: &[usize]) -> Vec<Vec<usize>> {
        let [center, p0, p1, p2] = [key[0], key[1], key[2], key[3]];
        match self {
            Self::Threefold => vec![
                vec![p0, center, p1, p2],
                vec![p1, center, p2, p0],
                vec![p2, center, p0, p1],
            ],
            Self::Single => vec![vec![p0, center, p1, p2]],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct ProperTorsionSettings {
    pub potential: String,
    pub default_idivf: IdivfPolicy,
    pub fractional_bondorder_method: String,
    pub fractional_bondorder_interpolation: InterpolationScheme,
}

impl Default for ProperTorsionSettings {
    fn default() -> Self {
        Self {
            potential: DEFAULT_TORSION_POTENTIAL.to_string(),
            default_idivf: IdivfPolicy::Auto,
            fractional_bondorder_method: "AM1-Wiberg".to_string(),
            fractional_bondorder_interpolation: InterpolationScheme::Linear,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct ImproperTorsionSettings {
    pub potential: String,
    pub default_idivf: IdivfPolicy,
    pub expansion: ImproperExpansion,
}

impl Default for ImproperTorsionSettings {
    fn default() -> Self {
        Self {
            potential: DEFAULT_TORSION_POTENTIAL.to_string(),
            default_idivf: IdivfPolicy::Auto,
            expansion: ImproperExpansion::Threefold,
        }
    }
}

impl Handler<ProperTorsionParameter> {
    pub fn assign(
        &self,
        graph: &dyn MolecularGraph,
        matcher: &dyn SmirksMatcher,
    ) -> Result<Vec<TorsionAssignment>, AssignmentError> {
        self.resolve(graph, matcher)?
            .into_iter()
            .map(|unit| {
                let p = unit.parameter;
                let (b, c) = (unit.atoms[1], unit.atoms[2]);
                let auto = torsion_multiplicity(graph, b, c);
                let terms = p
                    .terms
                    .iter()
                    .map(|term| {
                        let k = resolve_field(graph, p, &unit.atoms, [b, c], &term.k)?;
                        let idivf = self.settings.default_idivf.divisor(term, auto);
                        Ok(TorsionTerm {
                            periodicity: term.periodicity,
                            phase: term.phase,
                            k: k / idivf,
                            idivf,
                        })
                    })
                    .collect::<Result<Vec<_>, AssignmentError>>()?;
                Ok(TorsionAssignment {
                    atoms: unit.atoms,
                    parameter_id: p.id.clone(),
                    smirks: p.smirks.clone(),
                    position: unit.position,
                    terms,
                })
            })
            .collect()
    }
}

impl Handler<ImproperTorsionParameter> {
    /// Assigns impropers and expands every matched center per the configured
    /// [`ImproperExpansion`]. With an automatic divisor each term is divided by the
    /// number of expanded units.
    pub fn assign(
        &self,
        graph: &dyn MolecularGraph,
        matcher: &dyn SmirksMatcher,
    ) -> Result<Vec<TorsionAssignment>, AssignmentError> {
        let mut assignments = Vec::new();
        for unit in self.resolve(graph, matcher)? {
            let p = unit.parameter;
            let expanded = self.settings.expansion.units(&unit.atoms);
            let terms: Vec<TorsionTerm> = p
                .terms
                .iter()
                .map(|term| {
                    let k = term.k.resolve(None).unwrap_or_default();
                    let idivf = self.settings.default_idivf.divisor(term, expanded.len());
                    TorsionTerm {
                        periodicity: term.periodicity,
                        phase: term.phase,
                        k: k / idivf,
                        idivf,
                    }
                })
                .collect();
            assignments.extend(expanded.into_iter().map(|atoms| TorsionAssignment {
                atoms,
                parameter_id: p.id().to_string(),
                smirks: p.smirks().to_string(),
                position: unit.position,
                terms: terms.clone(),
            }));
        }
        Ok(assignments)
    }
}
