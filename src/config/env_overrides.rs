use super::{LogFormat, RuntimeConfig};
use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::PathBuf;

pub const ENV_PREFIX: &str = "CNPJ2PARQUET_";

/// Abstraction over environment-variable lookups so tests can supply their
/// own overrides without touching the process environment.
pub trait EnvSource {
    /// Look up `key` without the CNPJ2PARQUET_ prefix.
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads `CNPJ2PARQUET_*` variables from the process environment
pub struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(format!("{}{}", ENV_PREFIX, key)).ok()
    }
}

/// Apply environment-variable overrides to the runtime config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut RuntimeConfig, env: &E) -> Result<()> {
    if let Some(url) = get_env_string(env, "BASE_URL") {
        config.source.base_url = url;
    }

    // Directory roots
    if let Some(path) = get_env_path(env, "ZIP_ROOT") {
        config.paths.zip_root = path;
    }
    if let Some(path) = get_env_path(env, "PARQUET_ROOT") {
        config.paths.parquet_root = path;
    }
    if let Some(path) = get_env_path(env, "EXPORT_ROOT") {
        config.paths.export_root = path;
    }

    if let Some(val) = get_env_usize(env, "BATCH_SIZE")? {
        config.batch.max_rows = val;
    }

    if let Some(level) = get_env_string(env, "LOG_LEVEL") {
        config.log.level = level;
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT") {
        config.log.format = format
            .parse::<LogFormat>()
            .context("Invalid CNPJ2PARQUET_LOG_FORMAT value")?;
    }

    Ok(())
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get(key).filter(|val| !val.is_empty())
}

fn get_env_path<E: EnvSource>(env: &E, key: &str) -> Option<PathBuf> {
    get_env_string(env, key).map(PathBuf::from)
}

fn get_env_usize<E: EnvSource>(env: &E, key: &str) -> Result<Option<usize>> {
    match get_env_string(env, key) {
        Some(val) => {
            let parsed = val
                .parse::<usize>()
                .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}
