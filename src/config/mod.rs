pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_OUTPUT_PATH: &str = "output.txt";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "transit", version)]
#[command(about = "Convert an annotated XML document into a flat text report")]
pub struct CliConfig {
    /// Input XML document (overrides source.path from the config file)
    pub input: Option<String>,

    /// Report file to write [default: output.txt]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Log process CPU and memory usage after each phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the optional TOML file and layers the command line on top of it.
    pub fn resolve(&self) -> Result<RunConfig> {
        let file = match &self.config {
            Some(path) => {
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                Some(file)
            }
            None => None,
        };

        let mut config = RunConfig::merge(file.as_ref(), self.input.as_deref(), self.output.as_deref())?;
        config.json_logs |= self.json_logs;
        config.monitor |= self.monitor;
        config.validate()?;
        Ok(config)
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub input_path: String,
    pub output_path: String,
    pub log_level: Option<String>,
    pub json_logs: bool,
    pub monitor: bool,
}

impl RunConfig {
    pub fn new(input_path: impl Into<String>, output_path: impl Into<String>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            log_level: None,
            json_logs: false,
            monitor: false,
        }
    }

    /// Explicit values win over the file; the output path falls back to
    /// `output.txt`.
    pub fn merge(file: Option<&TomlConfig>, input: Option<&str>, output: Option<&str>) -> Result<Self> {
        let input = input
            .or_else(|| file.and_then(TomlConfig::input_path))
            .map(str::to_string);
        let input_path = validation::validate_required_field("input", &input)?.clone();

        let output_path = output
            .or_else(|| file.and_then(TomlConfig::output_path))
            .unwrap_or(DEFAULT_OUTPUT_PATH)
            .to_string();

        Ok(Self {
            input_path,
            output_path,
            log_level: file.and_then(TomlConfig::log_level).map(str::to_string),
            json_logs: file.map(TomlConfig::json_logs).unwrap_or(false),
            monitor: file.map(TomlConfig::monitoring_enabled).unwrap_or(false),
        })
    }
}

impl ConfigProvider for RunConfig {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input_path)?;
        validation::validate_path("output", &self.output_path)?;
        validation::validate_distinct_paths("output", &self.input_path, &self.output_path)?;
        if let Some(level) = &self.log_level {
            validation::validate_log_level("logging.level", level)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::TransitError;

    #[test]
    fn test_merge_defaults_output_path() {
        let config = RunConfig::merge(None, Some("doc.xml"), None).unwrap();
        assert_eq!(config, RunConfig::new("doc.xml", "output.txt"));
    }

    #[test]
    fn test_merge_requires_input() {
        let err = RunConfig::merge(None, None, Some("out.txt")).unwrap_err();
        assert!(matches!(err, TransitError::MissingConfigError { ref field } if field == "input"));
    }

    #[test]
    fn test_explicit_values_override_file() {
        let file = TomlConfig::from_toml_str(
            "[source]\npath = \"file.xml\"\n[load]\noutput_path = \"file.txt\"\n[monitoring]\nenabled = true\n",
        )
        .unwrap();

        let from_file = RunConfig::merge(Some(&file), None, None).unwrap();
        assert_eq!(from_file.input_path, "file.xml");
        assert_eq!(from_file.output_path, "file.txt");
        assert!(from_file.monitor);

        let overridden = RunConfig::merge(Some(&file), Some("cli.xml"), Some("cli.txt")).unwrap();
        assert_eq!(overridden.input_path, "cli.xml");
        assert_eq!(overridden.output_path, "cli.txt");
    }

    #[test]
    fn test_output_must_not_overwrite_input() {
        assert!(RunConfig::new("doc.xml", "doc.xml").validate().is_err());
        assert!(RunConfig::new("doc.xml", "out.txt").validate().is_ok());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_flags_layer_over_defaults() {
        let cli = CliConfig::parse_from(["transit", "doc.xml", "--output", "r.txt", "--monitor"]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.input_path, "doc.xml");
        assert_eq!(config.output_path, "r.txt");
        assert!(config.monitor);
        assert!(!config.json_logs);
    }
}
