use super::assignment::{AssignmentError, Labels};
use super::category::ParameterCategory;
use super::definitions::{
    AngleParameter, BondParameter, ChargeIncrementParameter, ConstraintParameter, GbsaParameter,
    ImproperTorsionParameter, LibraryChargeParameter, Parameter, ProperTorsionParameter,
    VdwParameter,
};
use super::handlers::Handler;
use super::handlers::electrostatics::ElectrostaticsSettings;
use super::store::StoreError;
use crate::core::io::forcefield::{ForceFieldDocument, ForceFieldLoadError};
use crate::core::models::graph::MolecularGraph;
use crate::core::smirks::matcher::SmirksMatcher;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_AROMATICITY_MODEL: &str = "OEAroModel_MDL";

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{} SMIRKS patterns were rejected by the matcher", .failures.len())]
pub struct PatternValidationError {
    pub failures: Vec<AssignmentError>,
}

/// An ordered set of parameter handlers.
///
/// Handlers are optional; a category without a handler contributes no assignments.
/// Definitions are edited through each handler's store while no pass is running;
/// parameterization only ever borrows the force field immutably.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceField {
    pub version: String,
    pub aromaticity_model: String,
    pub bonds: Option<Handler<BondParameter>>,
    pub angles: Option<Handler<AngleParameter>>,
    pub proper_torsions: Option<Handler<ProperTorsionParameter>>,
    pub improper_torsions: Option<Handler<ImproperTorsionParameter>>,
    pub vdw: Option<Handler<VdwParameter>>,
    pub electrostatics: Option<ElectrostaticsSettings>,
    pub library_charges: Option<Handler<LibraryChargeParameter>>,
    pub charge_increments: Option<Handler<ChargeIncrementParameter>>,
    pub constraints: Option<Handler<ConstraintParameter>>,
    pub gbsa: Option<Handler<GbsaParameter>>,
}

impl Default for ForceField {
    fn default() -> Self {
        Self {
            version: "0.3".to_string(),
            aromaticity_model: DEFAULT_AROMATICITY_MODEL.to_string(),
            bonds: None,
            angles: None,
            proper_torsions: None,
            improper_torsions: None,
            vdw: None,
            electrostatics: None,
            library_charges: None,
            charge_increments: None,
            constraints: None,
            gbsa: None,
        }
    }
}

impl ForceField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, ForceFieldLoadError> {
        let document = ForceFieldDocument::load(path)?;
        let forcefield = document.into_forcefield()?;
        info!(
            "Loaded force field from '{}' ({} definitions).",
            path.display(),
            forcefield.num_definitions()
        );
        Ok(forcefield)
    }

    /// Loads several sources and stacks them in order, so later files take precedence.
    pub fn load_all<T: AsRef<Path>>(paths: &[T]) -> Result<Self, ForceFieldLoadError> {
        let mut stacked: Option<ForceField> = None;
        for path in paths {
            let next = Self::load(path.as_ref())?;
            match stacked.as_mut() {
                Some(forcefield) => forcefield.merge(next)?,
                None => stacked = Some(next),
            }
        }
        Ok(stacked.unwrap_or_default())
    }

    /// Appends every definition of `other` after this force field's own.
    ///
    /// Appended definitions go through store validation, so an id already present in
    /// the same category is rejected and `self` is left untouched. Handler settings,
    /// electrostatics, version and aromaticity model stay with whichever source
    /// declared them first.
    pub fn merge(&mut self, other: ForceField) -> Result<(), StoreError> {
        fn append<P: Parameter>(
            into: &mut Option<Handler<P>>,
            from: Option<Handler<P>>,
        ) -> Result<(), StoreError> {
            let Some(from) = from else {
                return Ok(());
            };
            match into {
                Some(handler) => {
                    for parameter in from.store().iter() {
                        handler.store_mut().add(parameter.clone())?;
                    }
                }
                None => *into = Some(from),
            }
            Ok(())
        }

        let mut merged = self.clone();
        append(&mut merged.bonds, other.bonds)?;
        append(&mut merged.angles, other.angles)?;
        append(&mut merged.proper_torsions, other.proper_torsions)?;
        append(&mut merged.improper_torsions, other.improper_torsions)?;
        append(&mut merged.vdw, other.vdw)?;
        append(&mut merged.library_charges, other.library_charges)?;
        append(&mut merged.charge_increments, other.charge_increments)?;
        append(&mut merged.constraints, other.constraints)?;
        append(&mut merged.gbsa, other.gbsa)?;
        if merged.electrostatics.is_none() {
            merged.electrostatics = other.electrostatics;
        }
        debug!(
            "Merged force field now holds {} definitions.",
            merged.num_definitions()
        );
        *self = merged;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), ForceFieldLoadError> {
        ForceFieldDocument::from_forcefield(self).save(path)
    }

    pub fn bonds_mut(&mut self) -> &mut Handler<BondParameter> {
        self.bonds.get_or_insert_with(Handler::default)
    }

    pub fn angles_mut(&mut self) -> &mut Handler<AngleParameter> {
        self.angles.get_or_insert_with(Handler::default)
    }

    pub fn proper_torsions_mut(&mut self) -> &mut Handler<ProperTorsionParameter> {
        self.proper_torsions.get_or_insert_with(Handler::default)
    }

    pub fn improper_torsions_mut(&mut self) -> &mut Handler<ImproperTorsionParameter> {
        self.improper_torsions.get_or_insert_with(Handler::default)
    }

    pub fn vdw_mut(&mut self) -> &mut Handler<VdwParameter> {
        self.vdw.get_or_insert_with(Handler::default)
    }

    pub fn electrostatics_mut(&mut self) -> &mut ElectrostaticsSettings {
        self.electrostatics.get_or_insert_with(Default::default)
    }

    pub fn library_charges_mut(&mut self) -> &mut Handler<LibraryChargeParameter> {
        self.library_charges.get_or_insert_with(Handler::default)
    }

    pub fn charge_increments_mut(&mut self) -> &mut Handler<ChargeIncrementParameter> {
        self.charge_increments.get_or_insert_with(Handler::default)
    }

    pub fn constraints_mut(&mut self) -> &mut Handler<ConstraintParameter> {
        self.constraints.get_or_insert_with(Handler::default)
    }

    pub fn gbsa_mut(&mut self) -> &mut Handler<GbsaParameter> {
        self.gbsa.get_or_insert_with(Handler::default)
    }

    pub fn is_registered(&self, category: ParameterCategory) -> bool {
        match category {
            ParameterCategory::Bonds => self.bonds.is_some(),
            ParameterCategory::Angles => self.angles.is_some(),
            ParameterCategory::ProperTorsions => self.proper_torsions.is_some(),
            ParameterCategory::ImproperTorsions => self.improper_torsions.is_some(),
            ParameterCategory::Vdw => self.vdw.is_some(),
            ParameterCategory::Electrostatics => self.electrostatics.is_some(),
            ParameterCategory::LibraryCharges => self.library_charges.is_some(),
            ParameterCategory::ChargeIncrements => self.charge_increments.is_some(),
            ParameterCategory::Constraints => self.constraints.is_some(),
            ParameterCategory::Gbsa => self.gbsa.is_some(),
        }
    }

    /// Every `(category, id, smirks)` in pass order and, within a category, store order.
    pub fn definitions(&self) -> Vec<(ParameterCategory, &str, &str)> {
        fn collect<'a, P: Parameter>(
            out: &mut Vec<(ParameterCategory, &'a str, &'a str)>,
            handler: &'a Option<Handler<P>>,
        ) {
            if let Some(handler) = handler {
                out.extend(
                    handler
                        .store()
                        .iter()
                        .map(|p| (P::CATEGORY, p.id(), p.smirks())),
                );
            }
        }

        let mut out = Vec::new();
        collect(&mut out, &self.bonds);
        collect(&mut out, &self.angles);
        collect(&mut out, &self.proper_torsions);
        collect(&mut out, &self.improper_torsions);
        collect(&mut out, &self.vdw);
        collect(&mut out, &self.library_charges);
        collect(&mut out, &self.charge_increments);
        collect(&mut out, &self.constraints);
        collect(&mut out, &self.gbsa);
        out
    }

    pub fn num_definitions(&self) -> usize {
        self.definitions().len()
    }

    /// Asks the matcher to check every pattern up front, reporting all rejections.
    pub fn validate_patterns(&self, matcher: &dyn SmirksMatcher) -> Result<(), PatternValidationError> {
        let failures: Vec<AssignmentError> = self
            .definitions()
            .into_iter()
            .filter_map(|(category, id, smirks)| {
                matcher
                    .validate(smirks)
                    .err()
                    .map(|source| AssignmentError::Matcher {
                        category,
                        id: id.to_string(),
                        source,
                    })
            })
            .collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(PatternValidationError { failures })
        }
    }

    /// Runs every registered handler without enforcing coverage or assembling charges.
    pub fn label(
        &self,
        graph: &dyn MolecularGraph,
        matcher: &dyn SmirksMatcher,
    ) -> Result<Labels, AssignmentError> {
        let mut labels = Labels::default();
        if let Some(handler) = &self.bonds {
            labels.bonds = handler.assign(graph, matcher)?;
        }
        if let Some(handler) = &self.angles {
            labels.angles = handler.assign(graph, matcher)?;
        }
        if let Some(handler) = &self.proper_torsions {
            labels.proper_torsions = handler.assign(graph, matcher)?;
        }
        if let Some(handler) = &self.improper_torsions {
            labels.improper_torsions = handler.assign(graph, matcher)?;
        }
        if let Some(handler) = &self.vdw {
            labels.vdw = handler.assign(graph, matcher)?;
        }
        let mut from_library = vec![false; graph.num_atoms()];
        if let Some(handler) = &self.library_charges {
            labels.library_charges = handler.assign(graph, matcher)?;
            for atom in labels.library_charges.iter().flat_map(|a| a.atoms.iter()) {
                from_library[*atom] = true;
            }
        }
        if let Some(handler) = &self.charge_increments {
            labels.charge_increments = handler.assign(graph, matcher, &from_library)?;
        }
        if let Some(handler) = &self.constraints {
            labels.constraints = handler.assign(graph, matcher, &labels.bonds)?;
        }
        if let Some(handler) = &self.gbsa {
            labels.gbsa = handler.assign(graph, matcher)?;
        }
        debug!("Labeled {} units.", labels.len());
        Ok(labels)
    }
}
