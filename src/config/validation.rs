// Configuration validation
//
// Validates that required fields are present and values are sensible

use super::*;
use anyhow::{bail, Context, Result};

const LARGE_BATCH_ROWS: usize = 10_000_000;

pub fn validate_config(config: &RuntimeConfig) -> Result<()> {
    validate_source_config(&config.source)?;
    validate_paths_config(&config.paths)?;
    validate_batch_config(&config.batch)?;
    validate_log_config(&config.log)?;
    Ok(())
}

fn validate_source_config(config: &SourceConfig) -> Result<()> {
    let parsed = url::Url::parse(&config.base_url)
        .with_context(|| format!("source.base_url is not a valid URL: {}", config.base_url))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        bail!(
            "source.base_url must use http or https, got '{}'",
            parsed.scheme()
        );
    }

    Ok(())
}

fn validate_paths_config(config: &PathsConfig) -> Result<()> {
    for (name, path) in [
        ("paths.zip_root", &config.zip_root),
        ("paths.parquet_root", &config.parquet_root),
        ("paths.export_root", &config.export_root),
    ] {
        if path.as_os_str().is_empty() {
            bail!("{} cannot be empty", name);
        }
    }
    Ok(())
}

fn validate_batch_config(config: &BatchConfig) -> Result<()> {
    if config.max_rows == 0 {
        bail!("batch.max_rows must be greater than 0");
    }
    Ok(())
}

/// Settings that are valid but likely unintended.
///
/// Returned rather than logged, since configuration is loaded before the
/// subscriber exists.
pub fn config_warnings(config: &RuntimeConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    if config.batch.max_rows > LARGE_BATCH_ROWS {
        warnings.push(format!(
            "batch.max_rows = {} is very large; whole parts are held in memory",
            config.batch.max_rows
        ));
    }
    warnings
}

fn validate_log_config(config: &LogConfig) -> Result<()> {
    if config.level.trim().is_empty() {
        bail!("log.level cannot be empty");
    }
    Ok(())
}
