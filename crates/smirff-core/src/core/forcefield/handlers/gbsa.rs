use super::Handler;
use crate::core::forcefield::assignment::{AssignmentError, GbsaAssignment, GbsaTerms};
use crate::core::forcefield::definitions::GbsaParameter;
use crate::core::models::graph::MolecularGraph;
use crate::core::smirks::matcher::SmirksMatcher;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GbModel {
    #[default]
    Hct,
    Obc1,
    Obc2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SurfaceAreaModel {
    #[default]
    Ace,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct GbsaSettings {
    pub gb_model: GbModel,
    pub solvent_dielectric: f64,
    pub solute_dielectric: f64,
    pub sa_model: SurfaceAreaModel,
    /// kcal/mol/A^2
    pub surface_area_penalty: f64,
    /// Probe radius in angstroms.
    pub solvent_radius: f64,
}

impl Default for GbsaSettings {
    fn default() -> Self {
        Self {
            gb_model: GbModel::Hct,
            solvent_dielectric: 78.5,
            solute_dielectric: 1.0,
            sa_model: SurfaceAreaModel::Ace,
            surface_area_penalty: 5.4,
            solvent_radius: 1.4,
        }
    }
}

impl Handler<GbsaParameter> {
    pub fn assign(
        &self,
        graph: &dyn MolecularGraph,
        matcher: &dyn SmirksMatcher,
    ) -> Result<Vec<GbsaAssignment>, AssignmentError> {
        Ok(self
            .resolve(graph, matcher)?
            .into_iter()
            .map(|unit| GbsaAssignment {
                atoms: unit.atoms,
                parameter_id: unit.parameter.id.clone(),
                smirks: unit.parameter.smirks.clone(),
                position: unit.position,
                terms: GbsaTerms {
                    radius: unit.parameter.radius,
                    scale: unit.parameter.scale,
                },
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{HYDROGEN_ATOM, ethane, ethane_matcher};

    #[test]
    fn gbsa_terms_are_assigned_per_matched_atom() {
        let handler = Handler::with_parameters(
            GbsaSettings::default(),
            [GbsaParameter {
                id: "gb-h".into(),
                smirks: HYDROGEN_ATOM.into(),
                radius: 1.2,
                scale: 0.85,
            }],
        )
        .unwrap();
        let assignments = handler.assign(&ethane(), &ethane_matcher()).unwrap();
        assert_eq!(assignments.len(), 6);
        assert!(assignments.iter().all(|a| a.terms.scale == 0.85));
    }
}
