use crate::core::forcefield::handlers::electrostatics::BulkChargeMethod;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// Options of one parameterization pass that are not part of the force field itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterizationConfig {
    /// Base charge method for atoms without a library charge.
    pub bulk_charge_method: BulkChargeMethod,
    /// Emit scaled 1-2, 1-3 and 1-4 nonbonded exceptions in the assembled system.
    pub generate_exceptions: bool,
    /// Ask the matcher to check every pattern before the first stage runs.
    pub validate_patterns: bool,
}

#[derive(Default)]
pub struct ParameterizationConfigBuilder {
    bulk_charge_method: Option<BulkChargeMethod>,
    generate_exceptions: Option<bool>,
    validate_patterns: Option<bool>,
}

impl ParameterizationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bulk_charge_method(mut self, method: BulkChargeMethod) -> Self {
        self.bulk_charge_method = Some(method);
        self
    }
    pub fn generate_exceptions(mut self, enabled: bool) -> Self {
        self.generate_exceptions = Some(enabled);
        self
    }
    pub fn validate_patterns(mut self, enabled: bool) -> Self {
        self.validate_patterns = Some(enabled);
        self
    }

    pub fn build(self) -> Result<ParameterizationConfig, ConfigError> {
        Ok(ParameterizationConfig {
            bulk_charge_method: self
                .bulk_charge_method
                .ok_or(ConfigError::MissingParameter("bulk_charge_method"))?,
            generate_exceptions: self.generate_exceptions.unwrap_or(true),
            validate_patterns: self.validate_patterns.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_bulk_charge_method() {
        let result = ParameterizationConfigBuilder::new()
            .generate_exceptions(false)
            .build();
        assert_eq!(
            result,
            Err(ConfigError::MissingParameter("bulk_charge_method"))
        );
    }

    #[test]
    fn build_fills_optional_flags() {
        let config = ParameterizationConfigBuilder::new()
            .bulk_charge_method(BulkChargeMethod::FormalCharges)
            .build()
            .unwrap();
        assert_eq!(config.bulk_charge_method, BulkChargeMethod::FormalCharges);
        assert!(config.generate_exceptions);
        assert!(!config.validate_patterns);
    }
}
