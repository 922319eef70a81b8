// Configuration source loading
//
// Priority order:
// 1. Environment variables (CNPJ2PARQUET_* prefix)
// 2. Config file from --config, else CNPJ2PARQUET_CONFIG
// 3. Default config file (./cnpj2parquet.toml)
// 4. Built-in defaults

use super::env_overrides::{self, EnvSource};
use super::RuntimeConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_CONFIG_FILE: &str = "./cnpj2parquet.toml";

pub fn load_config<E: EnvSource>(explicit_path: Option<&Path>, env: &E) -> Result<RuntimeConfig> {
    let mut config = match config_file_path(explicit_path, env) {
        Some(path) => load_from_file_path(&path)?,
        None => RuntimeConfig::default(),
    };

    env_overrides::apply_env_overrides(&mut config, env)?;
    config.validate()?;
    Ok(config)
}

fn config_file_path<E: EnvSource>(explicit_path: Option<&Path>, env: &E) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Some(path) = env.get("CONFIG").filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }

    let default = Path::new(DEFAULT_CONFIG_FILE);
    default.exists().then(|| default.to_path_buf())
}

/// Read and parse a TOML config file. Missing sections keep their defaults.
fn load_from_file_path(path: &Path) -> Result<RuntimeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: RuntimeConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}
