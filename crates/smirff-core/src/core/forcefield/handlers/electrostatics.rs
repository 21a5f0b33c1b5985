use super::Handler;
use crate::core::forcefield::assignment::{AssignmentError, ChargeAssignment};
use crate::core::forcefield::definitions::{ChargeIncrementParameter, LibraryChargeParameter};
use crate::core::models::atom::Atom;
use crate::core::models::graph::MolecularGraph;
use crate::core::smirks::matcher::SmirksMatcher;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElectrostaticsMethod {
    #[default]
    Pme,
    ReactionField,
    Coulomb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct ElectrostaticsSettings {
    pub scale12: f64,
    pub scale13: f64,
    pub scale14: f64,
    pub scale15: f64,
    /// Cutoff distance in angstroms.
    pub cutoff: f64,
    pub method: ElectrostaticsMethod,
}

impl Default for ElectrostaticsSettings {
    fn default() -> Self {
        Self {
            scale12: 0.0,
            scale13: 0.0,
            scale14: 0.833_333_333_3,
            scale15: 1.0,
            cutoff: 9.0,
            method: ElectrostaticsMethod::Pme,
        }
    }
}

impl ElectrostaticsSettings {
    /// Scaling of the interaction between atoms `separation` bonds apart.
    pub fn scale_for(&self, separation: usize) -> f64 {
        match separation {
            1 => self.scale12,
            2 => self.scale13,
            3 => self.scale14,
            4 => self.scale15,
            _ => 1.0,
        }
    }
}

/// Where the base charge of atoms without a library charge comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BulkChargeMethod {
    /// Partial charges precomputed on the molecule by an external method.
    #[default]
    FromMolecule,
    /// Integer formal charges.
    FormalCharges,
    /// No base charge; only atoms reached by a charge increment receive a charge.
    None,
}

impl BulkChargeMethod {
    pub fn base_charge(&self, atom: &Atom) -> Option<f64> {
        match self {
            Self::FromMolecule => atom.partial_charge,
            Self::FormalCharges => Some(f64::from(atom.formal_charge)),
            Self::None => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown bulk charge method '{0}'")]
pub struct ParseBulkChargeMethodError(pub String);

impl FromStr for BulkChargeMethod {
    type Err = ParseBulkChargeMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "from-molecule" | "molecule" => Ok(Self::FromMolecule),
            "formal-charges" | "formal-charge" | "formal" => Ok(Self::FormalCharges),
            "none" => Ok(Self::None),
            _ => Err(ParseBulkChargeMethodError(s.to_string())),
        }
    }
}

impl fmt::Display for BulkChargeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FromMolecule => "from-molecule",
            Self::FormalCharges => "formal-charges",
            Self::None => "none",
        })
    }
}

/// Per-atom charges of one molecule and the matches that produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChargeResult {
    /// `None` for atoms no charge method reached.
    pub charges: Vec<Option<f64>>,
    pub library: Vec<ChargeAssignment>,
    pub increments: Vec<ChargeAssignment>,
}

impl ChargeResult {
    pub fn uncharged_atoms(&self) -> impl Iterator<Item = usize> + '_ {
        self.charges
            .iter()
            .enumerate()
            .filter(|(_, charge)| charge.is_none())
            .map(|(atom, _)| atom)
    }
}

/// Runs the charge chain: library charges, then the bulk method for the remaining
/// atoms, then charge increments on top of the bulk charges.
pub fn assign_charges(
    graph: &dyn MolecularGraph,
    matcher: &dyn SmirksMatcher,
    library: Option<&Handler<LibraryChargeParameter>>,
    increments: Option<&Handler<ChargeIncrementParameter>>,
    bulk: BulkChargeMethod,
) -> Result<ChargeResult, AssignmentError> {
    let n = graph.num_atoms();
    let mut charges: Vec<Option<f64>> = vec![None; n];
    let mut from_library = vec![false; n];

    let library = match library {
        Some(handler) => handler.assign(graph, matcher)?,
        None => Vec::new(),
    };
    for assignment in &library {
        for (&atom, &charge) in assignment.atoms.iter().zip(&assignment.terms) {
            charges[atom] = Some(charge);
            from_library[atom] = true;
        }
    }
    debug!(
        "Library charges cover {} of {} atoms.",
        from_library.iter().filter(|&&c| c).count(),
        n
    );

    let bulk = increments
        .and_then(|handler| handler.settings.partial_charge_method)
        .unwrap_or(bulk);
    for (atom, data) in graph.atoms().iter().enumerate() {
        if !from_library[atom] {
            charges[atom] = bulk.base_charge(data);
        }
    }

    let increments = match increments {
        Some(handler) => handler.assign(graph, matcher, &from_library)?,
        None => Vec::new(),
    };
    for assignment in &increments {
        for (&atom, &increment) in assignment.atoms.iter().zip(&assignment.terms) {
            match (&mut charges[atom], bulk) {
                (Some(charge), _) => *charge += increment,
                (slot, BulkChargeMethod::None) => *slot = Some(increment),
                (_, _) => {}
            }
        }
    }

    Ok(ChargeResult {
        charges,
        library,
        increments,
    })
}
