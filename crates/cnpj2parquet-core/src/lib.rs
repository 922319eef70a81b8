// cnpj2parquet-core - Registry archive conversion logic
//
// This crate turns registry archives into typed Parquet parts and joins the
// resulting tables into export shapes. It only touches the local filesystem:
// no network, no configuration, no logging setup.

pub mod dataset;
pub mod error;
pub mod extract;
pub mod join;
pub mod normalize;
pub mod parquet;
pub mod schema;

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

// Re-export commonly used types
pub use dataset::DatasetType;
pub use error::{CoreError, Result};
pub use extract::{RawTable, SkippedMember, TabularExtractor};
pub use join::{join_and_project, Projection};

/// Result of converting one archive into Parquet parts
#[derive(Debug)]
pub struct ConversionResult {
    /// Part files in part order
    pub parts: Vec<PathBuf>,
    pub rows: usize,
    /// Archive members left out of the table
    pub skipped: Vec<SkippedMember>,
}

/// Extract, normalize and write one archive as size-bounded Parquet parts.
///
/// Parts are written next to `base_path` (see [`parquet::part_path`]). Every
/// row carries the same `processed_at` value.
pub fn convert_archive(
    archive: &Path,
    dataset: DatasetType,
    processed_at: DateTime<Utc>,
    base_path: &Path,
    batch_size: usize,
) -> Result<ConversionResult> {
    let raw = TabularExtractor::new(dataset).extract_path(archive)?;
    let skipped = raw.skipped().to_vec();
    let table = raw.finish()?;

    let normalized = normalize::normalize_extracted(&table, dataset, processed_at)?;
    let parts = parquet::write_partitioned(&normalized, base_path, batch_size)?;

    Ok(ConversionResult {
        parts,
        rows: normalized.num_rows(),
        skipped,
    })
}
