use thiserror::Error;

use super::config::ConfigError;
use super::state::ParameterizationStage;
use crate::core::forcefield::assignment::AssignmentError;
use crate::core::forcefield::coverage::ParameterizationIncomplete;
use crate::core::forcefield::params::PatternValidationError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Stage '{stage}' failed: {source}")]
    Assignment {
        stage: ParameterizationStage,
        #[source]
        source: AssignmentError,
    },

    #[error("Parameterization incomplete: {0}")]
    Incomplete(#[from] ParameterizationIncomplete),

    #[error("Pattern validation failed: {0}")]
    PatternValidation(#[from] PatternValidationError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Wraps handler failures of `stage`.
    pub(crate) fn in_stage(stage: ParameterizationStage) -> impl Fn(AssignmentError) -> Self {
        move |source| Self::Assignment { stage, source }
    }

    /// The stage that was running when the pass failed.
    pub fn stage(&self) -> ParameterizationStage {
        match self {
            Self::Assignment { stage, .. } => *stage,
            Self::Incomplete(_) => ParameterizationStage::ValidatingCoverage,
            Self::PatternValidation(_) | Self::Config(_) => ParameterizationStage::Idle,
        }
    }
}
