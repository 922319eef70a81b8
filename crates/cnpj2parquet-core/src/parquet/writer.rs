// Parquet writer with size-optimized configuration
//
// Uses ZSTD compression and dictionary encoding. Registry text columns are
// highly repetitive (city codes, legal nature codes, status flags), so
// dictionaries pay off on every part.

use crate::error::{CoreError, Result};
use arrow::array::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::OnceLock;

fn compression_setting() -> Compression {
    Compression::ZSTD(ZstdLevel::try_new(2).unwrap_or_default())
}

pub fn writer_properties() -> &'static WriterProperties {
    static PROPERTIES: OnceLock<WriterProperties> = OnceLock::new();
    PROPERTIES.get_or_init(|| {
        WriterProperties::builder()
            .set_dictionary_enabled(true)
            .set_statistics_enabled(EnabledStatistics::Page)
            .set_compression(compression_setting())
            .set_data_page_size_limit(256 * 1024)
            .set_write_batch_size(32 * 1024)
            .set_max_row_group_size(32 * 1024) // rows, not bytes
            .set_dictionary_page_size_limit(128 * 1024)
            .set_created_by(format!("cnpj2parquet version {}", env!("CARGO_PKG_VERSION")))
            .build()
    })
}

/// Write Arrow `RecordBatch` into an arbitrary `Write` sink.
pub fn write_parquet_into<W>(batch: &RecordBatch, writer: W) -> Result<()>
where
    W: Write + Send,
{
    let props = writer_properties().clone();
    let mut arrow_writer = ArrowWriter::try_new(writer, batch.schema(), Some(props))?;

    arrow_writer.write(batch)?;
    arrow_writer.close()?;

    Ok(())
}

/// Write a batch to `path` as one self-contained Parquet file.
///
/// Parent directories are created. An existing file is overwritten.
pub fn write_parquet_file(batch: &RecordBatch, path: &Path) -> Result<u64> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;
    }

    let file = File::create(path).map_err(|e| CoreError::io(path, e))?;
    write_parquet_into(batch, BufWriter::new(file))?;

    let bytes = fs::metadata(path)
        .map_err(|e| CoreError::io(path, e))?
        .len();
    Ok(bytes)
}
