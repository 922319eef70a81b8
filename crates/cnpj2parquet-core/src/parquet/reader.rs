// Parquet table reading
//
// Accepts either a single file or a directory of parts. Directory entries are
// read in lexicographic order, which matches part-index order for the
// zero-padded names produced by the partitioned writer.

use crate::error::{CoreError, Result};
use arrow::array::RecordBatch;
use arrow::compute::concat_batches;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read a Parquet file, or every `*.parquet` file of a directory, into one batch.
pub fn read_table(path: &Path) -> Result<RecordBatch> {
    let files = if path.is_dir() {
        list_parquet_files(path)?
    } else {
        vec![path.to_path_buf()]
    };

    if files.is_empty() {
        return Err(CoreError::InvalidConfig(format!(
            "no Parquet files found in '{}'",
            path.display()
        )));
    }

    let mut schema = None;
    let mut batches = Vec::new();
    for file in &files {
        let handle = File::open(file).map_err(|e| CoreError::io(file, e))?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(handle)?;
        schema.get_or_insert_with(|| builder.schema().clone());

        for batch in builder.build()? {
            batches.push(batch?);
        }
        debug!(file = %file.display(), "Read Parquet file");
    }

    let schema = schema.ok_or_else(|| {
        CoreError::InvalidConfig(format!("no schema found in '{}'", path.display()))
    })?;
    Ok(concat_batches(&schema, &batches)?)
}

fn list_parquet_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| CoreError::io(dir, e))? {
        let path = entry.map_err(|e| CoreError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "parquet") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
