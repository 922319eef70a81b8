// cnpj2parquet - Registry archive pipeline
//
// Runtime shell around cnpj2parquet-core: configuration, logging setup,
// archive discovery and download, and the extract/export jobs the CLI runs.

pub mod config;
pub mod jobs;
pub mod source;

mod init;

pub use init::init_tracing;
