//! Configuration management for the CLI.
//!
//! One TOML file carries a table per pipeline stage plus display settings:
//!
//! ```toml
//! [validation]
//! disambiguate = "state"
//!
//! [curation]
//! keep_policy = "keep-most-complete"
//!
//! [analysis]
//! bootstrap_iterations = 5000
//!
//! [settings]
//! format = "json"
//! ```
//!
//! Every table and every key is optional.

use crate::error::{CliError, Result};
use progeny_curator::CuratorConfig;
use progeny_domain::SourceTag;
use progeny_gatekeeper::ValidationConfig;
use progeny_stats::AnalysisConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Record validation rules
    pub validation: ValidationConfig,

    /// Deduplication policy
    pub curation: CuratorConfig,

    /// Statistics parameters
    pub analysis: AnalysisConfig,

    /// Global settings
    pub settings: Settings,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Enable colored output
    pub color: bool,

    /// Default output format
    pub format: OutputFormat,

    /// Source tag for rows that do not name one
    pub default_source: SourceTag,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    #[default]
    Table,
    /// JSON format
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            default_source: SourceTag::Manual,
        }
    }
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".progeny").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `~/.progeny/config.toml` is
    /// used when present and defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::path() {
                Ok(path) if path.exists() => Self::from_file(&path),
                _ => {
                    debug!("No configuration file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Load configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&contents)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        let analysis = &self.analysis;
        if !(0.0..=1.0).contains(&analysis.reference_proportion) {
            return Err(CliError::Config(format!(
                "analysis.reference_proportion must be within [0, 1], got {}",
                analysis.reference_proportion
            )));
        }
        if !analysis.natural_sex_ratio.is_finite() || analysis.natural_sex_ratio <= 0.0 {
            return Err(CliError::Config(format!(
                "analysis.natural_sex_ratio must be positive, got {}",
                analysis.natural_sex_ratio
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use progeny_curator::{DedupScope, KeepPolicy};
    use progeny_gatekeeper::Disambiguation;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert_eq!(config.curation.keep_policy, KeepPolicy::KeepLast);
        assert_eq!(config.analysis.bootstrap_seed, 314);
    }

    #[test]
    fn test_partial_tables() {
        let config = Config::from_toml_str(
            r#"
            [validation]
            disambiguate = "state"

            [curation]
            keep_policy = "merge-fields"
            scope = "per-session"

            [analysis]
            bootstrap_iterations = 50

            [settings]
            format = "json"
            default_source = "wikipedia"
            "#,
        )
        .unwrap();

        assert_eq!(config.validation.disambiguate, Disambiguation::State);
        assert!(config.validation.blank_as_absent);
        assert_eq!(config.curation.keep_policy, KeepPolicy::MergeFields);
        assert_eq!(config.curation.scope, DedupScope::PerSession);
        assert_eq!(config.analysis.bootstrap_iterations, 50);
        assert_eq!(config.analysis.bootstrap_seed, 314);
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert_eq!(config.settings.default_source, SourceTag::Wikipedia);
        assert!(config.settings.color);
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.analysis.reference_proportion, 0.4878);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = Config::from_toml_str("[analysis]\nreference_proportion = 1.5\n");
        assert!(matches!(result, Err(CliError::Config(_))));

        let result = Config::from_toml_str("[curation]\nkeep_policy = \"keep-first\"\n");
        assert!(matches!(result, Err(CliError::Toml(_))));
    }

    #[test]
    fn test_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[settings]\ncolor = false").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert!(!config.settings.color);
    }

    #[test]
    fn test_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
