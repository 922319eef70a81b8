// Extract-one-part job
//
// Validates the request, locates the archive of the requested part, makes
// sure it is on local disk, then converts it into Parquet parts. Validation
// and download failures are returned as errors. A failure while converting
// is logged once and recorded in the report; parts already written stay.

use crate::config::{PathsConfig, RuntimeConfig};
use crate::source::{parse_dataset, ArchiveFetcher, SourceError, SourceIndex, Transport};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use cnpj2parquet_core::{convert_archive, DatasetType, SkippedMember};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Parameters of one extraction, fixed at construction
#[derive(Debug, Clone)]
pub struct ExtractJob {
    pub dataset: DatasetType,
    /// Zero-based archive index within the dataset
    pub part: i64,
    /// Download even when the archive is already on disk
    pub update: bool,
    pub batch_size: usize,
    pub base_url: String,
    pub paths: PathsConfig,
    /// Stamped on every extracted row
    pub processed_at: DateTime<Utc>,
}

/// Outcome of an extraction that got as far as the local archive
#[derive(Debug)]
pub struct ExtractReport {
    pub dataset: DatasetType,
    pub part: i64,
    pub archive: PathBuf,
    pub downloaded: bool,
    pub parts: Vec<PathBuf>,
    pub rows: usize,
    pub skipped: Vec<SkippedMember>,
    /// Set when the conversion failed
    pub failure: Option<String>,
}

impl ExtractReport {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

impl ExtractJob {
    /// Build a job from command-line values.
    ///
    /// Rejects an unknown dataset code and a negative part before any network
    /// or file access. `batch_size` falls back to the configured default.
    pub fn from_args(
        datatype: &str,
        part: i64,
        update: bool,
        batch_size: Option<usize>,
        config: &RuntimeConfig,
    ) -> Result<Self, SourceError> {
        let dataset = parse_dataset(datatype)?;
        if part < 0 {
            return Err(SourceError::NegativePart(part));
        }

        Ok(Self {
            dataset,
            part,
            update,
            batch_size: batch_size.unwrap_or(config.batch.max_rows),
            base_url: config.source.base_url.clone(),
            paths: config.paths.clone(),
            processed_at: Utc::now(),
        })
    }

    /// Discover the archive index, then run against it.
    pub fn run<T: Transport>(&self, transport: &T) -> Result<ExtractReport> {
        let index = SourceIndex::discover(transport, &self.base_url)
            .context("Failed to discover registry archives")?;
        self.run_with_index(&index, transport)
    }

    /// Run against an already discovered archive index.
    pub fn run_with_index<T: Transport>(
        &self,
        index: &SourceIndex,
        transport: &T,
    ) -> Result<ExtractReport> {
        if self.batch_size == 0 {
            anyhow::bail!("batch_size must be greater than 0");
        }

        let link = index.resolve(self.dataset, self.part)?;

        let archive = self.paths.archive_path(self.dataset, &link.filename);
        let base_path = self.paths.parquet_base_path(self.dataset, &link.filename);

        let fetcher = ArchiveFetcher::new(transport);
        let downloaded = if self.update {
            fetcher.fetch(&link.url, &archive)?;
            true
        } else {
            fetcher.fetch_if_missing(&link.url, &archive)?
        };

        let mut report = ExtractReport {
            dataset: self.dataset,
            part: self.part,
            archive: archive.clone(),
            downloaded,
            parts: Vec::new(),
            rows: 0,
            skipped: Vec::new(),
            failure: None,
        };

        info!(
            "---------------------- {}",
            link.filename.trim_end_matches(".zip")
        );
        info!("Reading csv within {}", archive.display());

        match convert_archive(
            &archive,
            self.dataset,
            self.processed_at,
            &base_path,
            self.batch_size,
        ) {
            Ok(result) => {
                info!(
                    dataset = %self.dataset,
                    part = self.part,
                    rows = result.rows,
                    parts = result.parts.len(),
                    skipped = result.skipped.len(),
                    "Extraction finished"
                );
                report.parts = result.parts;
                report.rows = result.rows;
                report.skipped = result.skipped;
            }
            Err(err) => {
                error!(archive = %archive.display(), error = %err, "Extraction failed");
                for path in err.written_parts() {
                    warn!("Part kept on disk after the failure: {}", path.display());
                }
                report.parts = err.written_parts().to_vec();
                report.failure = Some(err.to_string());
            }
        }

        Ok(report)
    }
}
