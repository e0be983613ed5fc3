//! Configuration handling for the longalign CLI
//!
//! Supports loading configuration from longalign.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use clap::ValueEnum;
use longalign_core::AlignerParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CliError, CliResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub align: AlignerParams,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable deterministic mode for reproducible results
    #[serde(default)]
    pub deterministic: bool,

    /// Default number of threads to use
    #[serde(default = "default_threads")]
    pub threads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Region table format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One tab-separated line per region
    Tsv,
    /// Full per-query reports
    Json,
}

// Default value functions
fn default_threads() -> usize { num_cpus::get() }
fn default_format() -> OutputFormat { OutputFormat::Tsv }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            deterministic: false,
            threads: default_threads(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from("longalign.toml");
                if default_path.exists() {
                    log::info!("Loading configuration from: longalign.toml");
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> CliResult<String> {
        Ok(toml::to_string_pretty(&Self::default())?)
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.general.threads == 0 {
            return Err(CliError::config("general.threads must be at least 1"));
        }
        self.align
            .validate()
            .map_err(|e| CliError::config(format!("[align] {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.general.deterministic);
        assert!(config.general.threads >= 1);
        assert_eq!(config.align, AlignerParams::default());
        assert_eq!(config.output.format, OutputFormat::Tsv);
    }

    #[test]
    fn test_config_roundtrip() -> Result<()> {
        let mut config = Config::default();
        config.align.rng_seed = Some(7);
        config.align.max_iterations = Some(1000);
        config.output.format = OutputFormat::Json;
        let temp_file = NamedTempFile::new()?;

        config.save_to_file(temp_file.path())?;
        let loaded_config = Config::load_from_file(temp_file.path())?;

        assert_eq!(loaded_config.align, config.align);
        assert_eq!(loaded_config.output.format, OutputFormat::Json);
        assert_eq!(loaded_config.general.threads, config.general.threads);

        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[align]\ndefault_seed_length = 12\n").unwrap();
        assert_eq!(config.align.default_seed_length, 12);
        assert_eq!(config.align.maximum_seeding_tries, 30);
        assert_eq!(config.output.format, OutputFormat::Tsv);
    }

    #[test]
    fn test_invalid_align_section_rejected() {
        let config: Config = toml::from_str("[align]\nmaximum_seeding_tries = 0\n").unwrap();
        assert!(matches!(config.validate(), Err(CliError::Config { .. })));
    }

    #[test]
    fn test_example_toml_generation() {
        let example = Config::example_toml().unwrap();
        assert!(example.contains("[general]"));
        assert!(example.contains("[align]"));
        assert!(example.contains("[output]"));
        assert!(example.contains("default_seed_length = 20"));
    }
}
