use super::Handler;
use crate::core::forcefield::assignment::{AssignmentError, VdwAssignment, VdwTerms};
use crate::core::forcefield::definitions::VdwParameter;
use crate::core::models::graph::MolecularGraph;
use crate::core::smirks::matcher::SmirksMatcher;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CombiningRules {
    /// Arithmetic mean of sigma, geometric mean of epsilon.
    #[default]
    LorentzBerthelot,
    /// Geometric mean of both sigma and epsilon.
    Geometric,
}

impl CombiningRules {
    /// Returns the `(sigma, epsilon)` of a pair.
    pub fn combine(&self, a: VdwTerms, b: VdwTerms) -> (f64, f64) {
        let epsilon = (a.epsilon * b.epsilon).sqrt();
        let sigma = match self {
            Self::LorentzBerthelot => 0.5 * (a.sigma + b.sigma),
            Self::Geometric => (a.sigma * b.sigma).sqrt(),
        };
        (sigma, epsilon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VdwMethod {
    #[default]
    Cutoff,
    Pme,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct VdwSettings {
    pub potential: String,
    pub combining_rules: CombiningRules,
    pub scale12: f64,
    pub scale13: f64,
    pub scale14: f64,
    pub scale15: f64,
    /// Cutoff distance in angstroms.
    pub cutoff: f64,
    pub switch_width: f64,
    pub method: VdwMethod,
}

impl Default for VdwSettings {
    fn default() -> Self {
        Self {
            potential: "Lennard-Jones-12-6".to_string(),
            combining_rules: CombiningRules::LorentzBerthelot,
            scale12: 0.0,
            scale13: 0.0,
            scale14: 0.5,
            scale15: 1.0,
            cutoff: 9.0,
            switch_width: 1.0,
            method: VdwMethod::Cutoff,
        }
    }
}

impl VdwSettings {
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

impl Handler<VdwParameter> {
    pub fn assign(
        &self,
        graph: &dyn MolecularGraph,
        matcher: &dyn SmirksMatcher,
    ) -> Result<Vec<VdwAssignment>, AssignmentError> {
        Ok(self
            .resolve(graph, matcher)?
            .into_iter()
            .map(|unit| VdwAssignment {
                atoms: unit.atoms,
                parameter_id: unit.parameter.id.clone(),
                smirks: unit.parameter.smirks.clone(),
                position: unit.position,
                terms: VdwTerms {
                    epsilon: unit.parameter.epsilon,
                    sigma: unit.parameter.sigma(),
                },
            })
            .collect())
    }
}
