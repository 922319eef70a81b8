//! Error types for the conversion core

use thiserror::Error;

/// Errors that can occur while extracting, normalizing, writing or joining tables
#[derive(Debug, Error)]
pub enum CoreError {
    /// Filesystem operation failed
    #[error("I/O failed for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Archive could not be opened or a member could not be read
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Delimited text could not be tokenized
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Arrow kernel failure (cast, concat, take, batch construction)
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet encoding or decoding failure
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// A source row does not match the positional layout of its dataset
    #[error("Layout mismatch in '{member}' at record {record}: expected {expected} fields, found {found}")]
    SchemaMismatch {
        member: String,
        record: u64,
        expected: usize,
        found: usize,
    },

    /// A column required by a projection or join is not present
    #[error("Column '{column}' not found (available: {available})")]
    MissingColumn { column: String, available: String },

    /// A partitioned write stopped partway; `written` parts are on disk
    #[error("Failed after writing {} part(s): {source}", written.len())]
    PartialWrite {
        written: Vec<std::path::PathBuf>,
        #[source]
        source: Box<CoreError>,
    },

    /// Invalid parameter supplied by the caller
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Dataset code or name that maps to no registry table
    #[error("Not recognized dataset '{0}' (expected one of: est, emp, soc, sim)")]
    UnknownDataset(String),
}

impl CoreError {
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Part files that were written before the error, if any
    pub fn written_parts(&self) -> &[std::path::PathBuf] {
        match self {
            Self::PartialWrite { written, .. } => written,
            _ => &[],
        }
    }

    pub(crate) fn missing_column(column: &str, schema: &arrow::datatypes::Schema) -> Self {
        let available = schema
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self::MissingColumn {
            column: column.to_string(),
            available,
        }
    }
}

/// Result type alias for CoreError
pub type Result<T> = std::result::Result<T, CoreError>;
