// Registry source discovery and download
//
// The registry publishes an HTML index of numbered archives. The catalog
// turns that page into per-dataset, ordered link lists; the fetcher copies
// one archive to local disk. All network access goes through `Transport`.

mod catalog;
mod fetch;
mod transport;

pub use catalog::{parse_links, SourceIndex, SourceLink};
pub use fetch::ArchiveFetcher;
pub use transport::{HttpTransport, Transport};

use cnpj2parquet_core::DatasetType;
use thiserror::Error;

/// Errors raised while locating or downloading registry archives
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Negative values are not allowed (part = {0})")]
    NegativePart(i64),

    #[error("{dataset} has only {available} parts, but part = {part} was requested")]
    PartOutOfRange {
        dataset: DatasetType,
        part: i64,
        available: usize,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("I/O failed for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Not recognized datatype '{0}' (expected one of: est, emp, soc, sim)")]
    UnknownDataset(String),
}

impl SourceError {
    pub(crate) fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

/// Resolve a command-line dataset code.
pub fn parse_dataset(code: &str) -> Result<DatasetType, SourceError> {
    DatasetType::from_code(code).map_err(|_| SourceError::UnknownDataset(code.to_string()))
}
