use phf::phf_map;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

static SYMBOLS_BY_NUMBER: phf::Map<u8, &'static str> = phf_map! {
    1u8 => "H", 2u8 => "He", 3u8 => "Li", 4u8 => "Be", 5u8 => "B", 6u8 => "C",
    7u8 => "N", 8u8 => "O", 9u8 => "F", 10u8 => "Ne", 11u8 => "Na", 12u8 => "Mg",
    13u8 => "Al", 14u8 => "Si", 15u8 => "P", 16u8 => "S", 17u8 => "Cl", 18u8 => "Ar",
    19u8 => "K", 20u8 => "Ca", 21u8 => "Sc", 22u8 => "Ti", 23u8 => "V", 24u8 => "Cr",
    25u8 => "Mn", 26u8 => "Fe", 27u8 => "Co", 28u8 => "Ni", 29u8 => "Cu", 30u8 => "Zn",
    31u8 => "Ga", 32u8 => "Ge", 33u8 => "As", 34u8 => "Se", 35u8 => "Br", 36u8 => "Kr",
    37u8 => "Rb", 38u8 => "Sr", 39u8 => "Y", 40u8 => "Zr", 41u8 => "Nb", 42u8 => "Mo",
    43u8 => "Tc", 44u8 => "Ru", 45u8 => "Rh", 46u8 => "Pd", 47u8 => "Ag", 48u8 => "Cd",
    49u8 => "In", 50u8 => "Sn", 51u8 => "Sb", 52u8 => "Te", 53u8 => "I", 54u8 => "Xe",
};

static NUMBERS_BY_SYMBOL: phf::Map<&'static str, u8> = phf_map! {
    "H" => 1u8, "He" => 2u8, "Li" => 3u8, "Be" => 4u8, "B" => 5u8, "C" => 6u8,
    "N" => 7u8, "O" => 8u8, "F" => 9u8, "Ne" => 10u8, "Na" => 11u8, "Mg" => 12u8,
    "Al" => 13u8, "Si" => 14u8, "P" => 15u8, "S" => 16u8, "Cl" => 17u8, "Ar" => 18u8,
    "K" => 19u8, "Ca" => 20u8, "Sc" => 21u8, "Ti" => 22u8, "V" => 23u8, "Cr" => 24u8,
    "Mn" => 25u8, "Fe" => 26u8, "Co" => 27u8, "Ni" => 28u8, "Cu" => 29u8, "Zn" => 30u8,
    "Ga" => 31u8, "Ge" => 32u8, "As" => 33u8, "Se" => 34u8, "Br" => 35u8, "Kr" => 36u8,
    "Rb" => 37u8, "Sr" => 38u8, "Y" => 39u8, "Zr" => 40u8, "Nb" => 41u8, "Mo" => 42u8,
    "Tc" => 43u8, "Ru" => 44u8, "Rh" => 45u8, "Pd" => 46u8, "Ag" => 47u8, "Cd" => 48u8,
    "In" => 49u8, "Sn" => 50u8, "Sb" => 51u8, "Te" => 52u8, "I" => 53u8, "Xe" => 54u8,
};

/// A chemical element identified by its atomic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element(u8);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ElementError {
    #[error("Unknown element symbol: '{0}'")]
    UnknownSymbol(String),
    #[error("Unsupported atomic number: {0}")]
    UnsupportedAtomicNumber(u8),
}

impl Element {
    pub const HYDROGEN: Element = Element(1);
    pub const CARBON: Element = Element(6);
    pub const NITROGEN: Element = Element(7);
    pub const OXYGEN: Element = Element(8);

    pub fn from_atomic_number(number: u8) -> Result<Self, ElementError> {
        if SYMBOLS_BY_NUMBER.contains_key(&number) {
            Ok(Self(number))
        } else {
            Err(ElementError::UnsupportedAtomicNumber(number))
        }
    }

    #[inline]
    pub fn atomic_number(&self) -> u8 {
        self.0
    }

    pub fn symbol(&self) -> &'static str {
        SYMBOLS_BY_NUMBER.get(&self.0).copied().unwrap_or("X")
    }
}

impl FromStr for Element {
    type Err = ElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let normalized: String = match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(|c| c.to_lowercase()))
                .collect(),
            None => String::new(),
        };
        NUMBERS_BY_SYMBOL
            .get(normalized.as_str())
            .map(|&n| Self(n))
            .ok_or_else(|| ElementError::UnknownSymbol(s.to_string()))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let symbol = String::deserialize(deserializer)?;
        symbol.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_parses_symbols_case_insensitively() {
        assert_eq!("C".parse::<Element>().unwrap(), Element::CARBON);
        assert_eq!("cl".parse::<Element>().unwrap().atomic_number(), 17);
        assert_eq!("BR".parse::<Element>().unwrap().symbol(), "Br");
    }

    #[test]
    fn from_str_rejects_unknown_symbols() {
        assert_eq!(
            "Qq".parse::<Element>(),
            Err(ElementError::UnknownSymbol("Qq".to_string()))
        );
        assert!("".parse::<Element>().is_err());
    }

    #[test]
    fn from_atomic_number_checks_the_table() {
        assert_eq!(Element::from_atomic_number(8).unwrap(), Element::OXYGEN);
        assert_eq!(
            Element::from_atomic_number(0),
            Err(ElementError::UnsupportedAtomicNumber(0))
        );
    }

    #[test]
    fn display_outputs_symbol() {
        assert_eq!(Element::HYDROGEN.to_string(), "H");
        assert_eq!(Element::NITROGEN.to_string(), "N");
    }
}
