use crate::cli::ParameterizeArgs;
use crate::error::{CliError, Result};
use serde::Deserialize;
use smirff::core::forcefield::handlers::electrostatics::BulkChargeMethod;
use smirff::engine::config::{ParameterizationConfig, ParameterizationConfigBuilder};
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialChargesConfig {
    #[serde(rename = "bulk-method")]
    bulk_method: Option<BulkChargeMethod>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialAssemblyConfig {
    #[serde(rename = "generate-exceptions")]
    generate_exceptions: Option<bool>,
    #[serde(rename = "validate-patterns")]
    validate_patterns: Option<bool>,
}

/// The run configuration as read from a file; every value may still come from the CLI.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialParameterizeConfig {
    charges: Option<PartialChargesConfig>,
    assembly: Option<PartialAssemblyConfig>,
}

impl PartialParameterizeConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Resolves every value with CLI arguments first, then the file, then defaults.
    pub fn merge_with_cli(mut self, args: &ParameterizeArgs) -> Result<ParameterizationConfig> {
        self.apply_set_values(&args.set_values)?;

        let charges = self.charges.take().unwrap_or_default();
        let assembly = self.assembly.take().unwrap_or_default();

        let bulk_charge_method = args
            .charge_method
            .or(charges.bulk_method)
            .unwrap_or_default();
        let generate_exceptions = if args.no_exceptions {
            false
        } else {
            assembly.generate_exceptions.unwrap_or(true)
        };
        let validate_patterns =
            args.validate_patterns || assembly.validate_patterns.unwrap_or(false);

        ParameterizationConfigBuilder::new()
            .bulk_charge_method(bulk_charge_method)
            .generate_exceptions(generate_exceptions)
            .validate_patterns(validate_patterns)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            let parse_bool = |value: &str| -> Result<bool> {
                value.parse().map_err(|_| {
                    CliError::Config(format!("Invalid boolean value for {}: {}", key, value))
                })
            };

            match key {
                "charges.bulk-method" => {
                    self.charges.get_or_insert_with(Default::default).bulk_method =
                        Some(value_str.parse().map_err(|e| {
                            CliError::Config(format!("Invalid value for {}: {}", key, e))
                        })?);
                }
                "assembly.generate-exceptions" => {
                    self.assembly
                        .get_or_insert_with(Default::default)
                        .generate_exceptions = Some(parse_bool(value_str)?);
                }
                "assembly.validate-patterns" => {
                    self.assembly
                        .get_or_insert_with(Default::default)
                        .validate_patterns = Some(parse_bool(value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_config_file(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("run.toml");
        fs::write(&path, content).unwrap();
        path
    }

    fn parameterize_args(extra: &[&str]) -> ParameterizeArgs {
        let mut argv = vec![
            "smirff",
            "parameterize",
            "-f",
            "ff.toml",
            "-m",
            "mols.toml",
            "-o",
            "out.toml",
        ];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Parameterize(args) => args,
            other => panic!("expected 'parameterize', got {other:?}"),
        }
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let config = PartialParameterizeConfig::default()
            .merge_with_cli(&parameterize_args(&[]))
            .unwrap();
        assert_eq!(config.bulk_charge_method, BulkChargeMethod::FromMolecule);
        assert!(config.generate_exceptions);
        assert!(!config.validate_patterns);
    }

    #[test]
    fn file_values_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            [charges]
            bulk-method = "formal-charges"

            [assembly]
            generate-exceptions = false
            validate-patterns = true
            "#,
        );
        let config = PartialParameterizeConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&parameterize_args(&[]))
            .unwrap();
        assert_eq!(config.bulk_charge_method, BulkChargeMethod::FormalCharges);
        assert!(!config.generate_exceptions);
        assert!(config.validate_patterns);
    }

    #[test]
    fn cli_args_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            [charges]
            bulk-method = "formal-charges"
            "#,
        );
        let args = parameterize_args(&["--charge-method", "none", "--no-exceptions"]);
        let config = PartialParameterizeConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();
        assert_eq!(config.bulk_charge_method, BulkChargeMethod::None);
        assert!(!config.generate_exceptions);
    }

    #[test]
    fn set_values_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            [assembly]
            generate-exceptions = true
            "#,
        );
        let args = parameterize_args(&[
            "-S",
            "assembly.generate-exceptions=false",
            "-S",
            "charges.bulk-method=formal",
        ]);
        let config = PartialParameterizeConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();
        assert!(!config.generate_exceptions);
        assert_eq!(config.bulk_charge_method, BulkChargeMethod::FormalCharges);
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        for bad in ["assembly.generate-exceptions", "assembly.unknown=1", "assembly.validate-patterns=maybe"] {
            let args = parameterize_args(&["-S", bad]);
            let result = PartialParameterizeConfig::default().merge_with_cli(&args);
            assert!(matches!(result, Err(CliError::Config(_))), "accepted '{bad}'");
        }
    }

    #[test]
    fn unknown_file_keys_are_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(&dir, "[charges]\nmethod = \"none\"\n");
        assert!(matches!(
            PartialParameterizeConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }
}
