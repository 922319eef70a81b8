// Size-bounded partitioned writes
//
// A table is split into consecutive slices of at most `batch_size` rows and
// each slice is written as its own Parquet file:
// {dir}/{stem}_part_{NN}.{ext}

use super::writer::write_parquet_file;
use crate::error::{CoreError, Result};
use arrow::array::RecordBatch;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::info;

/// Row ranges covering `row_count` rows in slices of at most `batch_size`.
///
/// Zero rows produce zero ranges. The last range is clamped to `row_count`.
pub fn part_ranges(row_count: usize, batch_size: usize) -> Result<Vec<Range<usize>>> {
    if batch_size == 0 {
        return Err(CoreError::InvalidConfig(
            "batch_size must be greater than 0".to_string(),
        ));
    }

    let n_parts = row_count.div_ceil(batch_size);
    Ok((0..n_parts)
        .map(|i| {
            let start = i * batch_size;
            let end = (start + batch_size).min(row_count);
            start..end
        })
        .collect())
}

/// Path of the part with zero-based `index`, numbered from 1 in the filename.
///
/// `Estabelecimentos0.parquet`, index 0 -> `Estabelecimentos0_part_01.parquet`
pub fn part_path(base: &Path, index: usize) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let filename = match base.extension() {
        Some(ext) => format!("{}_part_{:02}.{}", stem, index + 1, ext.to_string_lossy()),
        None => format!("{}_part_{:02}", stem, index + 1),
    };

    base.with_file_name(filename)
}

/// Write `batch` as size-bounded parts next to `base_path`.
///
/// Returns the written paths in part order. Existing files are overwritten.
/// When a part fails after earlier ones were written, the error is
/// [`CoreError::PartialWrite`] carrying the paths already on disk.
pub fn write_partitioned(
    batch: &RecordBatch,
    base_path: &Path,
    batch_size: usize,
) -> Result<Vec<PathBuf>> {
    let ranges = part_ranges(batch.num_rows(), batch_size)?;
    let n_parts = ranges.len();
    let mut written = Vec::with_capacity(n_parts);

    if n_parts == 0 {
        info!("No rows to persist for {}", base_path.display());
        return Ok(written);
    }

    for (index, range) in ranges.into_iter().enumerate() {
        let slice = batch.slice(range.start, range.len());
        let path = part_path(base_path, index);

        info!(
            "Persisting the part {} of {} ({} rows) to {}",
            index + 1,
            n_parts,
            slice.num_rows(),
            path.display()
        );
        let bytes = match write_parquet_file(&slice, &path) {
            Ok(bytes) => bytes,
            Err(err) if written.is_empty() => return Err(err),
            Err(err) => {
                return Err(CoreError::PartialWrite {
                    written,
                    source: Box::new(err),
                })
            }
        };
        tracing::debug!(bytes, path = %path.display(), "Part written");

        written.push(path);
    }

    Ok(written)
}
