// cnpj2parquet configuration
//
// Supports configuration from multiple sources:
// 1. Command-line flags (highest priority, applied by the caller)
// 2. Environment variables (CNPJ2PARQUET_* prefix)
// 3. Config file: --config PATH, else CNPJ2PARQUET_CONFIG, else ./cnpj2parquet.toml
// 4. Built-in defaults (lowest priority)

use anyhow::{Context, Result};
use cnpj2parquet_core::DatasetType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod env_overrides;
mod sources;
mod validation;

pub use env_overrides::{EnvSource, StdEnvSource, ENV_PREFIX};

/// Main runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Where the registry publishes its archives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dadosabertos.rfb.gov.br/CNPJ/".to_string(),
        }
    }
}

/// Local directory roots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Downloaded archives, one subdirectory per dataset
    pub zip_root: PathBuf,
    /// Normalized Parquet parts, one subdirectory per dataset
    pub parquet_root: PathBuf,
    /// Joined exports, one subdirectory per projection
    pub export_root: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            zip_root: PathBuf::from("datasets/raw/zip"),
            parquet_root: PathBuf::from("datasets/interim/parquet"),
            export_root: PathBuf::from("datasets/interim/parquet"),
        }
    }
}

impl PathsConfig {
    /// `{zip_root}/{dataset}/{filename}`
    pub fn archive_path(&self, dataset: DatasetType, filename: &str) -> PathBuf {
        self.zip_root.join(dataset.directory_name()).join(filename)
    }

    /// `{parquet_root}/{dataset}/{archive stem}.parquet`, the base name of an archive's parts
    pub fn parquet_base_path(&self, dataset: DatasetType, archive_filename: &str) -> PathBuf {
        let stem = Path::new(archive_filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| archive_filename.to_string());
        self.parquet_root
            .join(dataset.directory_name())
            .join(format!("{}.parquet", stem))
    }
}

/// Partitioned write configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum rows per Parquet part
    pub max_rows: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_rows: 1_000_000,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Unsupported log format: {}. Supported: text, json", s),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from all sources with priority.
    ///
    /// `explicit_path` is the `--config` flag; when given, the file must exist.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        sources::load_config(explicit_path, &StdEnvSource)
    }

    /// Load configuration with a custom environment source (useful for testing).
    pub fn load_with_env<E: EnvSource>(explicit_path: Option<&Path>, env: &E) -> Result<Self> {
        sources::load_config(explicit_path, env)
    }

    /// Parse TOML content layered over the defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config content")
    }

    /// Apply environment overrides from a custom source.
    pub fn apply_env_overrides_from<E: EnvSource>(&mut self, env: &E) -> Result<()> {
        env_overrides::apply_env_overrides(self, env)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Warnings about valid but suspicious settings, to log once tracing is up
    pub fn warnings(&self) -> Vec<String> {
        validation::config_warnings(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let config = RuntimeConfig::default();
        assert_eq!(config.source.base_url, "https://dadosabertos.rfb.gov.br/CNPJ/");
        assert_eq!(config.paths.zip_root, PathBuf::from("datasets/raw/zip"));
        assert_eq!(config.batch.max_rows, 1_000_000);
        assert_eq!(config.log.format, LogFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RuntimeConfig::from_toml(
            r#"
            [batch]
            max_rows = 5000

            [log]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.batch.max_rows, 5000);
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.paths, PathsConfig::default());
    }

    #[test]
    fn test_dataset_paths() {
        let paths = PathsConfig::default();
        assert_eq!(
            paths.archive_path(DatasetType::Establishments, "Estabelecimentos3.zip"),
            PathBuf::from("datasets/raw/zip/Estabelecimentos/Estabelecimentos3.zip")
        );
        assert_eq!(
            paths.parquet_base_path(DatasetType::Companies, "Empresas0.zip"),
            PathBuf::from("datasets/interim/parquet/Empresas/Empresas0.parquet")
        );
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("TEXT".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
