use crate::core::models::units::Symmetry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The force categories a force field can hold definitions for.
///
/// Declaration order is the order in which a parameterization pass visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParameterCategory {
    Bonds,
    Angles,
    ProperTorsions,
    ImproperTorsions,
    Vdw,
    Electrostatics,
    LibraryCharges,
    ChargeIncrements,
    Constraints,
    Gbsa,
}

impl ParameterCategory {
    pub const ALL: [ParameterCategory; 10] = [
        Self::Bonds,
        Self::Angles,
        Self::ProperTorsions,
        Self::ImproperTorsions,
        Self::Vdw,
        Self::Electrostatics,
        Self::LibraryCharges,
        Self::ChargeIncrements,
        Self::Constraints,
        Self::Gbsa,
    ];

    /// Number of tagged atoms a definition of this category must declare, or `None`
    /// when any positive number is allowed.
    pub fn tagged_atoms(&self) -> Option<usize> {
        match self {
            Self::Bonds | Self::Constraints => Some(2),
            Self::Angles => Some(3),
            Self::ProperTorsions | Self::ImproperTorsions => Some(4),
            Self::Vdw | Self::Electrostatics | Self::Gbsa => Some(1),
            Self::LibraryCharges | Self::ChargeIncrements => None,
        }
    }

    /// The permutations under which two matched tuples denote the same unit.
    pub fn symmetry(&self) -> Symmetry {
        match self {
            Self::Bonds | Self::Angles | Self::ProperTorsions | Self::Constraints => {
                Symmetry::Reversible
            }
            Self::ImproperTorsions => Symmetry::Improper,
            Self::Vdw | Self::Electrostatics | Self::Gbsa => Symmetry::Ordered,
            Self::LibraryCharges | Self::ChargeIncrements => Symmetry::Unordered,
        }
    }

    /// Whether every unit of this category must be parameterized once its handler is
    /// registered. Bonds, angles and proper torsions are required even without a handler.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            Self::Bonds | Self::Angles | Self::ProperTorsions | Self::Vdw | Self::Electrostatics
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bonds => "Bonds",
            Self::Angles => "Angles",
            Self::ProperTorsions => "ProperTorsions",
            Self::ImproperTorsions => "ImproperTorsions",
            Self::Vdw => "vdW",
            Self::Electrostatics => "Electrostatics",
            Self::LibraryCharges => "LibraryCharges",
            Self::ChargeIncrements => "ChargeIncrementModel",
            Self::Constraints => "Constraints",
            Self::Gbsa => "GBSA",
        }
    }
}

impl fmt::Display for ParameterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown parameter category '{0}'")]
pub struct ParseCategoryError(pub String);

impl FromStr for ParameterCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "bonds" => Ok(Self::Bonds),
            "angles" => Ok(Self::Angles),
            "propertorsions" => Ok(Self::ProperTorsions),
            "impropertorsions" => Ok(Self::ImproperTorsions),
            "vdw" => Ok(Self::Vdw),
            "electrostatics" => Ok(Self::Electrostatics),
            "librarycharges" => Ok(Self::LibraryCharges),
            "chargeincrements" | "chargeincrementmodel" => Ok(Self::ChargeIncrements),
            "constraints" => Ok(Self::Constraints),
            "gbsa" => Ok(Self::Gbsa),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}
