use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// The integer bond order used when no fractional order is available.
    pub fn nominal(&self) -> f64 {
        match self {
            Self::Single => 1.0,
            Self::Double => 2.0,
            Self::Triple => 3.0,
            Self::Aromatic => 1.5,
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid bond order string")]
pub struct ParseBondOrderError;

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "s" | "single" => Ok(Self::Single),
            "2" | "d" | "double" => Ok(Self::Double),
            "3" | "t" | "triple" => Ok(Self::Triple),
            "ar" | "aromatic" => Ok(Self::Aromatic),
            _ => Err(ParseBondOrderError),
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Single => "Single",
                Self::Double => "Double",
                Self::Triple => "Triple",
                Self::Aromatic => "Aromatic",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Bond {
    pub atoms: [usize; 2], // zero-based atom indices
    #[serde(default)]
    pub order: BondOrder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stereo: Option<String>,
    /// Precomputed (e.g. Wiberg) fractional bond order, typically in [1, 2].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fractional_order: Option<f64>,
}

impl Bond {
    pub fn new(atom1: usize, atom2: usize, order: BondOrder) -> Self {
        Self {
            atoms: [atom1, atom2],
            order,
            stereo: None,
            fractional_order: None,
        }
    }

    pub fn with_fractional_order(mut self, fractional_order: f64) -> Self {
        self.fractional_order = Some(fractional_order);
        self
    }

    pub fn contains(&self, atom: usize) -> bool {
        self.atoms[0] == atom || self.atoms[1] == atom
    }

    pub fn connects(&self, a: usize, b: usize) -> bool {
        (self.atoms[0] == a && self.atoms[1] == b) || (self.atoms[0] == b && self.atoms[1] == a)
    }

    pub fn is_aromatic(&self) -> bool {
        self.order == BondOrder::Aromatic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bond_order_from_str_parses_valid_strings() {
        assert_eq!("1".parse::<BondOrder>().unwrap(), BondOrder::Single);
        assert_eq!("single".parse::<BondOrder>().unwrap(), BondOrder::Single);
        assert_eq!("D".parse::<BondOrder>().unwrap(), BondOrder::Double);
        assert_eq!("triple".parse::<BondOrder>().unwrap(), BondOrder::Triple);
        assert_eq!("ar".parse::<BondOrder>().unwrap(), BondOrder::Aromatic);
    }

    #[test]
    fn bond_order_from_str_rejects_invalid_strings() {
        assert!("".parse::<BondOrder>().is_err());
        assert!("quadruple".parse::<BondOrder>().is_err());
        assert!("0".parse::<BondOrder>().is_err());
    }

    #[test]
    fn bond_order_display_and_nominal_values() {
        assert_eq!(BondOrder::Double.to_string(), "Double");
        assert_eq!(BondOrder::default(), BondOrder::Single);
        assert_eq!(BondOrder::Aromatic.nominal(), 1.5);
    }

    #[test]
    fn bond_connects_is_orientation_independent() {
        let bond = Bond::new(3, 7, BondOrder::Single);
        assert!(bond.connects(3, 7));
        assert!(bond.connects(7, 3));
        assert!(!bond.connects(3, 4));
        assert!(bond.contains(7));
        assert!(!bond.contains(1));
    }
}
