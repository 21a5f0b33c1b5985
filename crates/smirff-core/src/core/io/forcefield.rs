use crate::core::forcefield::definitions::{
    AngleParameter, BondParameter, ChargeIncrementParameter, ConstraintParameter, GbsaParameter,
    ImproperTorsionParameter, LibraryChargeParameter, Parameter, ProperTorsionParameter,
    VdwParameter,
};
use crate::core::forcefield::handlers::Handler;
use crate::core::forcefield::handlers::electrostatics::ElectrostaticsSettings;
use crate::core::forcefield::params::{DEFAULT_AROMATICITY_MODEL, ForceField};
use crate::core::forcefield::store::StoreError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForceFieldLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("TOML serialization error: {source}")]
    Serialize { source: toml::ser::Error },
    #[error("Invalid force-field definition: {0}")]
    Store(#[from] StoreError),
}

/// One handler block: settings plus an ordered `[[<section>.parameter]]` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(bound(
    serialize = "S: Serialize, P: Serialize",
    deserialize = "S: Deserialize<'de> + Default, P: Deserialize<'de>"
))]
pub struct Section<S, P> {
    #[serde(default)]
    pub settings: S,
    #[serde(default, rename = "parameter")]
    pub parameters: Vec<P>,
}

impl<P: Parameter> Section<P::Settings, P> {
    fn from_handler(handler: &Handler<P>) -> Self {
        Self {
            settings: handler.settings.clone(),
            parameters: handler.store().iter().cloned().collect(),
        }
    }

    fn into_handler(self) -> Result<Handler<P>, StoreError> {
        Handler::with_parameters(self.settings, self.parameters)
    }
}

fn default_version() -> String {
    ForceField::default().version
}

fn default_aromaticity_model() -> String {
    DEFAULT_AROMATICITY_MODEL.to_string()
}

/// The serialized form of a [`ForceField`].
///
/// Array order inside each section is precedence order and survives a load/save
/// round trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ForceFieldDocument {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_aromaticity_model")]
    pub aromaticity_model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonds: Option<Section<<BondParameter as Parameter>::Settings, BondParameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angles: Option<Section<<AngleParameter as Parameter>::Settings, AngleParameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proper_torsions:
        Option<Section<<ProperTorsionParameter as Parameter>::Settings, ProperTorsionParameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improper_torsions: Option<
        Section<<ImproperTorsionParameter as Parameter>::Settings, ImproperTorsionParameter>,
    >,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vdw: Option<Section<<VdwParameter as Parameter>::Settings, VdwParameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electrostatics: Option<ElectrostaticsSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_charges:
        Option<Section<<LibraryChargeParameter as Parameter>::Settings, LibraryChargeParameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_increments: Option<
        Section<<ChargeIncrementParameter as Parameter>::Settings, ChargeIncrementParameter>,
    >,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints:
        Option<Section<<ConstraintParameter as Parameter>::Settings, ConstraintParameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gbsa: Option<Section<<GbsaParameter as Parameter>::Settings, GbsaParameter>>,
}

impl ForceFieldDocument {
    pub fn load(path: &Path) -> Result<Self, ForceFieldLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ForceFieldLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ForceFieldLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ForceFieldLoadError> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(|e| ForceFieldLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn to_toml_string(&self) -> Result<String, ForceFieldLoadError> {
        toml::to_string(self).map_err(|source| ForceFieldLoadError::Serialize { source })
    }

    pub fn from_forcefield(forcefield: &ForceField) -> Self {
        Self {
            version: forcefield.version.clone(),
            aromaticity_model: forcefield.aromaticity_model.clone(),
            bonds: forcefield.bonds.as_ref().map(Section::from_handler),
            angles: forcefield.angles.as_ref().map(Section::from_handler),
            proper_torsions: forcefield.proper_torsions.as_ref().map(Section::from_handler),
            improper_torsions: forcefield
                .improper_torsions
                .as_ref()
                .map(Section::from_handler),
            vdw: forcefield.vdw.as_ref().map(Section::from_handler),
            electrostatics: forcefield.electrostatics.clone(),
            library_charges: forcefield.library_charges.as_ref().map(Section::from_handler),
            charge_increments: forcefield
                .charge_increments
                .as_ref()
                .map(Section::from_handler),
            constraints: forcefield.constraints.as_ref().map(Section::from_handler),
            gbsa: forcefield.gbsa.as_ref().map(Section::from_handler),
        }
    }

    /// Rebuilds the force field, inserting every definition through store validation.
    pub fn into_forcefield(self) -> Result<ForceField, StoreError> {
        Ok(ForceField {
            version: self.version,
            aromaticity_model: self.aromaticity_model,
            bonds: self.bonds.map(Section::into_handler).transpose()?,
            angles: self.angles.map(Section::into_handler).transpose()?,
            proper_torsions: self.proper_torsions.map(Section::into_handler).transpose()?,
            improper_torsions: self
                .improper_torsions
                .map(Section::into_handler)
                .transpose()?,
            vdw: self.vdw.map(Section::into_handler).transpose()?,
            electrostatics: self.electrostatics,
            library_charges: self.library_charges.map(Section::into_handler).transpose()?,
            charge_increments: self
                .charge_increments
                .map(Section::into_handler)
                .transpose()?,
            constraints: self.constraints.map(Section::into_handler).transpose()?,
            gbsa: self.gbsa.map(Section::into_handler).transpose()?,
        })
    }
}

pub fn from_toml_str(content: &str) -> Result<ForceField, ForceFieldLoadError> {
    let document: ForceFieldDocument =
        toml::from_str(content).map_err(|e| ForceFieldLoadError::Toml {
            path: "<string>".to_string(),
            source: e,
        })?;
    Ok(document.into_forcefield()?)
}

pub fn to_toml_string(forcefield: &ForceField) -> Result<String, ForceFieldLoadError> {
    ForceFieldDocument::from_forcefield(forcefield).to_toml_string()
}
