// Export-one-label job

use crate::config::RuntimeConfig;
use anyhow::{bail, Context, Result};
use cnpj2parquet_core::parquet::{read_table, write_parquet_file};
use cnpj2parquet_core::{join_and_project, Projection};
use std::path::PathBuf;
use tracing::info;

/// Join two normalized tables and write one projection under a label
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Parquet file or directory of parts
    pub establishments: PathBuf,
    /// Parquet file or directory of parts
    pub companies: PathBuf,
    pub label: String,
    pub projection: Projection,
    pub export_root: PathBuf,
}

#[derive(Debug)]
pub struct ExportReport {
    pub output: PathBuf,
    pub rows: usize,
    pub bytes: u64,
}

impl ExportJob {
    pub fn new(
        establishments: PathBuf,
        companies: PathBuf,
        label: impl Into<String>,
        projection: Projection,
        config: &RuntimeConfig,
    ) -> Result<Self> {
        let label = label.into();
        if label.is_empty() {
            bail!("label cannot be empty");
        }
        if label.contains(['/', '\\']) || label == "." || label == ".." {
            bail!("label '{}' must be a plain name, not a path", label);
        }

        Ok(Self {
            establishments,
            companies,
            label,
            projection,
            export_root: config.paths.export_root.clone(),
        })
    }

    pub fn output_path(&self) -> PathBuf {
        self.projection.output_path(&self.export_root, &self.label)
    }

    pub fn run(&self) -> Result<ExportReport> {
        info!(
            "Reading establishments from {}",
            self.establishments.display()
        );
        let establishments = read_table(&self.establishments).with_context(|| {
            format!(
                "Failed to read establishments from {}",
                self.establishments.display()
            )
        })?;

        info!("Reading companies from {}", self.companies.display());
        let companies = read_table(&self.companies).with_context(|| {
            format!("Failed to read companies from {}", self.companies.display())
        })?;

        let table = join_and_project(&establishments, &companies, self.projection)
            .with_context(|| format!("Failed to build the {} projection", self.projection))?;

        let output = self.output_path();
        let bytes = write_parquet_file(&table, &output)
            .with_context(|| format!("Failed to write {}", output.display()))?;

        info!(
            projection = %self.projection,
            rows = table.num_rows(),
            bytes,
            "Wrote {}",
            output.display()
        );

        Ok(ExportReport {
            output,
            rows: table.num_rows(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(label: &str, projection: Projection) -> Result<ExportJob> {
        let mut config = RuntimeConfig::default();
        config.paths.export_root = PathBuf::from("/exports");
        ExportJob::new(
            PathBuf::from("est"),
            PathBuf::from("emp"),
            label,
            projection,
            &config,
        )
    }

    #[test]
    fn test_output_path_follows_projection() {
        assert_eq!(
            job("4", Projection::SummaryInfo).unwrap().output_path(),
            PathBuf::from("/exports/SummaryInfo/part-000004.parquet")
        );
        assert_eq!(
            job("4", Projection::Merged).unwrap().output_path(),
            PathBuf::from("/exports/Merged/4.parquet")
        );
    }

    #[test]
    fn test_label_must_be_plain() {
        assert!(job("", Projection::Names).is_err());
        assert!(job("../escape", Projection::Names).is_err());
        assert!(job("..", Projection::Names).is_err());
    }

    #[test]
    fn test_missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RuntimeConfig::default();
        config.paths.export_root = dir.path().to_path_buf();
        let job = ExportJob::new(
            dir.path().join("missing-est.parquet"),
            dir.path().join("missing-emp.parquet"),
            "1",
            Projection::Names,
            &config,
        )
        .unwrap();

        let err = job.run().unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read establishments"));
    }
}
