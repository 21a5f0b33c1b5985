use super::category::ParameterCategory;
use super::handlers::{
    angles::AngleSettings, bonds::BondSettings, constraints::ConstraintSettings,
    gbsa::GbsaSettings, library::LibraryChargeSettings, increments::ChargeIncrementSettings,
    torsions::{ImproperTorsionSettings, ProperTorsionSettings},
    vdw::VdwSettings,
};
use super::interpolation::BondOrderValue;
use crate::core::smirks::pattern::{SmirksError, SmirksPattern};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Tolerance for the zero-sum rule of charge-increment definitions.
pub const CHARGE_SUM_TOLERANCE: f64 = 1e-8;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Parameter '{id}' has a malformed SMIRKS pattern: {source}")]
    MalformedPattern {
        id: String,
        #[source]
        source: SmirksError,
    },
    #[error(
        "Parameter '{id}' ({category}) declares {found} tagged atoms in '{smirks}', expected {expected}"
    )]
    TaggedAtomMismatch {
        category: ParameterCategory,
        id: String,
        smirks: String,
        expected: usize,
        found: usize,
    },
    #[error("Charge increments of '{id}' ('{smirks}') sum to {sum}, not zero")]
    ChargeSumInvalid { id: String, smirks: String, sum: f64 },
    #[error("Parameter '{id}' lists {found} charges for {expected} tagged atoms")]
    ChargeCountMismatch {
        id: String,
        expected: usize,
        found: usize,
    },
    #[error("Field '{field}' of '{id}' has both anchors at bond order {bond_order}")]
    InvalidAnchors {
        id: String,
        field: &'static str,
        bond_order: f64,
    },
    #[error("Field '{field}' of '{id}' is invalid: {reason}")]
    InvalidField {
        id: String,
        field: &'static str,
        reason: String,
    },
}

/// A typed parameter definition held by a [`super::store::ParameterStore`].
pub trait Parameter: Clone + fmt::Debug + Send + Sync {
    const CATEGORY: ParameterCategory;

    /// Handler-level settings shared by every definition of the category.
    type Settings: Clone + fmt::Debug + Default + PartialEq + Send + Sync;

    fn id(&self) -> &str;
    fn smirks(&self) -> &str;

    /// Category-specific field checks, given the pattern's tagged-atom count.
    fn check_fields(&self, _tagged_atoms: usize) -> Result<(), ParameterError> {
        Ok(())
    }

    /// Checks the pattern, its tagged-atom count and the category fields. Returns the
    /// number of tagged atoms.
    fn validate(&self) -> Result<usize, ParameterError> {
        let pattern =
            SmirksPattern::parse(self.smirks()).map_err(|source| ParameterError::MalformedPattern {
                id: self.id().to_string(),
                source,
            })?;
        let found = pattern.tagged_atoms();
        let expected = Self::CATEGORY.tagged_atoms().unwrap_or(found.max(1));
        if found != expected {
            return Err(ParameterError::TaggedAtomMismatch {
                category: Self::CATEGORY,
                id: self.id().to_string(),
                smirks: self.smirks().to_string(),
                expected,
                found,
            });
        }
        self.check_fields(found)?;
        Ok(found)
    }
}

fn check_anchors(id: &str, field: &'static str, value: &BondOrderValue) -> Result<(), ParameterError> {
    match value.degenerate_anchor() {
        Some(bond_order) => Err(ParameterError::InvalidAnchors {
            id: id.to_string(),
            field,
            bond_order,
        }),
        None => Ok(()),
    }
}

fn check_positive(id: &str, field: &'static str, value: f64) -> Result<(), ParameterError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ParameterError::InvalidField {
            id: id.to_string(),
            field,
            reason: format!("{value} is not a positive number"),
        })
    }
}

macro_rules! impl_identity {
    () => {
        fn id(&self) -> &str {
            &self.id
        }
        fn smirks(&self) -> &str {
            &self.smirks
        }
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BondParameter {
    pub id: String,
    pub smirks: String,
    pub length: BondOrderValue,
    pub k: BondOrderValue,
}

impl Parameter for BondParameter {
    const CATEGORY: ParameterCategory = ParameterCategory::Bonds;
    type Settings = BondSettings;
    impl_identity!();

    fn check_fields(&self, _tagged_atoms: usize) -> Result<(), ParameterError> {
        check_anchors(&self.id, "length", &self.length)?;
        check_anchors(&self.id, "k", &self.k)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AngleParameter {
    pub id: String,
    pub smirks: String,
    /// Equilibrium angle in degrees.
    pub angle: f64,
    pub k: f64,
}

impl Parameter for AngleParameter {
    const CATEGORY: ParameterCategory = ParameterCategory::Angles;
    type Settings = AngleSettings;
    impl_identity!();
}

/// One periodic term `k * (1 + cos(periodicity * phi - phase))` of a torsion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FourierTerm {
    pub periodicity: u32,
    /// Phase in degrees.
    pub phase: f64,
    pub k: BondOrderValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idivf: Option<f64>,
}

impl FourierTerm {
    pub fn new(periodicity: u32, phase: f64, k: impl Into<BondOrderValue>) -> Self {
        Self {
            periodicity,
            phase,
            k: k.into(),
            idivf: None,
        }
    }

    pub fn with_idivf(mut self, idivf: f64) -> Self {
        self.idivf = Some(idivf);
        self
    }
}

fn check_terms(id: &str, terms: &[FourierTerm]) -> Result<(), ParameterError> {
    if terms.is_empty() {
        return Err(ParameterError::InvalidField {
            id: id.to_string(),
            field: "terms",
            reason: "at least one Fourier term is required".to_string(),
        });
    }
    for term in terms {
        if term.periodicity == 0 {
            return Err(ParameterError::InvalidField {
                id: id.to_string(),
                field: "periodicity",
                reason: "periodicity must be at least 1".to_string(),
            });
        }
        check_anchors(id, "k", &term.k)?;
        if let Some(idivf) = term.idivf {
            check_positive(id, "idivf", idivf)?;
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProperTorsionParameter {
    pub id: String,
    pub smirks: String,
    pub terms: Vec<FourierTerm>,
}

impl Parameter for ProperTorsionParameter {
    const CATEGORY: ParameterCategory = ParameterCategory::ProperTorsions;
    type Settings = ProperTorsionSettings;
    impl_identity!();

    fn check_fields(&self, _tagged_atoms: usize) -> Result<(), ParameterError> {
        check_terms(&self.id, &self.terms)
    }
}

/// An improper torsion definition. Tag `:2` is the central atom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ImproperTorsionParameter {
    pub id: String,
    pub smirks: String,
    pub terms: Vec<FourierTerm>,
}

impl Parameter for ImproperTorsionParameter {
    const CATEGORY: ParameterCategory = ParameterCategory::ImproperTorsions;
    type Settings = ImproperTorsionSettings;
    impl_identity!();

    fn check_fields(&self, _tagged_atoms: usize) -> Result<(), ParameterError> {
        check_terms(&self.id, &self.terms)?;
        if let Some(term) = self.terms.iter().find(|t| t.k.is_interpolated()) {
            return Err(ParameterError::InvalidField {
                id: self.id.clone(),
                field: "k",
                reason: format!(
                    "periodicity {} term cannot be bond-order dependent",
                    term.periodicity
                ),
            });
        }
        Ok(())
    }
}

/// A Lennard-Jones definition. Exactly one of `sigma` and `rmin-half` is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct VdwParameter {
    pub id: String,
    pub smirks: String,
    pub epsilon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sigma: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rmin_half: Option<f64>,
}

impl VdwParameter {
    /// The size parameter as sigma, converting from `rmin/2` when needed.
    pub fn sigma(&self) -> f64 {
        match (self.sigma, self.rmin_half) {
            (Some(sigma), _) => sigma,
            (None, Some(rmin_half)) => 2.0 * rmin_half / 2f64.powf(1.0 / 6.0),
            (None, None) => 0.0,
        }
    }
}

impl Parameter for VdwParameter {
    const CATEGORY: ParameterCategory = ParameterCategory::Vdw;
    type Settings = VdwSettings;
    impl_identity!();

    fn check_fields(&self, _tagged_atoms: usize) -> Result<(), ParameterError> {
        if self.sigma.is_some() == self.rmin_half.is_some() {
            return Err(ParameterError::InvalidField {
                id: self.id.clone(),
                field: "sigma",
                reason: "exactly one of 'sigma' and 'rmin-half' must be given".to_string(),
            });
        }
        if self.epsilon < 0.0 || !self.epsilon.is_finite() {
            return Err(ParameterError::InvalidField {
                id: self.id.clone(),
                field: "epsilon",
                reason: format!("{} is not a non-negative number", self.epsilon),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct LibraryChargeParameter {
    pub id: String,
    pub smirks: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// One charge per tagged atom, in tag order.
    pub charges: Vec<f64>,
}

impl Parameter for LibraryChargeParameter {
    const CATEGORY: ParameterCategory = ParameterCategory::LibraryCharges;
    type Settings = LibraryChargeSettings;
    impl_identity!();

    fn check_fields(&self, tagged_atoms: usize) -> Result<(), ParameterError> {
        if self.charges.len() != tagged_atoms {
            return Err(ParameterError::ChargeCountMismatch {
                id: self.id.clone(),
                expected: tagged_atoms,
                found: self.charges.len(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ChargeIncrementParameter {
    pub id: String,
    pub smirks: String,
    /// Signed charge moved onto each tagged atom, in tag order. Sums to zero.
    pub increments: Vec<f64>,
}

impl Parameter for ChargeIncrementParameter {
    const CATEGORY: ParameterCategory = ParameterCategory::ChargeIncrements;
    type Settings = ChargeIncrementSettings;
    impl_identity!();

    fn check_fields(&self, tagged_atoms: usize) -> Result<(), ParameterError> {
        if self.increments.len() != tagged_atoms {
            return Err(ParameterError::ChargeCountMismatch {
                id: self.id.clone(),
                expected: tagged_atoms,
                found: self.increments.len(),
            });
        }
        let sum: f64 = self.increments.iter().sum();
        if !sum.is_finite() || sum.abs() > CHARGE_SUM_TOLERANCE {
            return Err(ParameterError::ChargeSumInvalid {
                id: self.id.clone(),
                smirks: self.smirks.clone(),
                sum,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConstraintParameter {
    pub id: String,
    pub smirks: String,
    /// Fixed distance; when absent the bond's equilibrium length is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl Parameter for ConstraintParameter {
    const CATEGORY: ParameterCategory = ParameterCategory::Constraints;
    type Settings = ConstraintSettings;
    impl_identity!();

    fn check_fields(&self, _tagged_atoms: usize) -> Result<(), ParameterError> {
        match self.distance {
            Some(distance) => check_positive(&self.id, "distance", distance),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct GbsaParameter {
    pub id: String,
    pub smirks: String,
    pub radius: f64,
    pub scale: f64,
}

impl Parameter for GbsaParameter {
    const CATEGORY: ParameterCategory = ParameterCategory::Gbsa;
    type Settings = GbsaSettings;
    impl_identity!();

    fn check_fields(&self, _tagged_atoms: usize) -> Result<(), ParameterError> {
        check_positive(&self.id, "radius", self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::interpolation::Anchor;

    fn increments(values: &[f64]) -> ChargeIncrementParameter {
        ChargeIncrementParameter {
            id: "ci1".into(),
            smirks: "[#6:1]-[#1:2]-[#8:3]".into(),
            increments: values.to_vec(),
        }
    }

    #[test]
    fn charge_increments_must_sum_to_zero() {
        assert!(matches!(
            increments(&[0.02, -0.01, -0.005]).validate(),
            Err(ParameterError::ChargeSumInvalid { .. })
        ));
        assert_eq!(increments(&[0.02, -0.01, -0.01]).validate(), Ok(3));
    }

    #[test]
    fn charge_increments_must_cover_every_tagged_atom() {
        assert!(matches!(
            increments(&[0.01, -0.01]).validate(),
            Err(ParameterError::ChargeCountMismatch {
                expected: 3,
                found: 2,
                ..
            })
        ));
    }

    #[test]
    fn tagged_atom_count_is_checked_per_category() {
        let bond = BondParameter {
            id: "b1".into(),
            smirks: "[#6:1]-[#6:2]-[#1:3]".into(),
            length: 1.5.into(),
            k: 500.0.into(),
        };
        assert!(matches!(
            bond.validate(),
            Err(ParameterError::TaggedAtomMismatch {
                expected: 2,
                found: 3,
                ..
            })
        ));
    }

    #[test]
    fn malformed_patterns_are_rejected() {
        let angle = AngleParameter {
            id: "a1".into(),
            smirks: "[#1:1]-[#6:2]-[#1:3".into(),
            angle: 109.5,
            k: 100.0,
        };
        assert!(matches!(
            angle.validate(),
            Err(ParameterError::MalformedPattern { .. })
        ));
    }

    #[test]
    fn interpolated_fields_need_distinct_anchors() {
        let bond = BondParameter {
            id: "b1".into(),
            smirks: "[#6:1]~[#6:2]".into(),
            length: 1.4.into(),
            k: BondOrderValue::interpolated(Anchor::new(1.0, 100.0), Anchor::new(1.0, 200.0)),
        };
        assert!(matches!(
            bond.validate(),
            Err(ParameterError::InvalidAnchors { field: "k", .. })
        ));
    }

    #[test]
    fn vdw_requires_exactly_one_size_field() {
        let mut vdw = VdwParameter {
            id: "n1".into(),
            smirks: "[#1:1]".into(),
            epsilon: 0.0157,
            sigma: None,
            rmin_half: Some(0.6),
        };
        assert_eq!(vdw.validate(), Ok(1));
        assert!((vdw.sigma() - 2.0 * 0.6 / 2f64.powf(1.0 / 6.0)).abs() < 1e-12);

        vdw.sigma = Some(1.0);
        assert!(matches!(
            vdw.validate(),
            Err(ParameterError::InvalidField { field: "sigma", .. })
        ));
    }

    #[test]
    fn torsions_need_at_least_one_term() {
        let torsion = ProperTorsionParameter {
            id: "t1".into(),
            smirks: "[*:1]-[#6X4:2]-[#6X4:3]-[*:4]".into(),
            terms: Vec::new(),
        };
        assert!(matches!(
            torsion.validate(),
            Err(ParameterError::InvalidField { field: "terms", .. })
        ));
    }

    #[test]
    fn library_charges_match_tag_count() {
        let library = LibraryChargeParameter {
            id: "lib1".into(),
            smirks: "[#3+1:1]".into(),
            name: Some("Li+".into()),
            charges: vec![1.0],
        };
        assert_eq!(library.validate(), Ok(1));
    }
}
