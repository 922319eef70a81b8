use super::{SourceError, Transport};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Copies registry archives to local disk
#[derive(Debug)]
pub struct ArchiveFetcher<T> {
    transport: T,
}

impl<T: Transport> ArchiveFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Download `url` to `destination`, replacing any existing file.
    ///
    /// The body is staged next to the destination and renamed into place, so
    /// an interrupted download never leaves a truncated archive behind.
    /// Returns the number of bytes written.
    pub fn fetch(&self, url: &str, destination: &Path) -> Result<u64, SourceError> {
        info!(
            "Downloading zip from {} and persisting to {}",
            url,
            destination.display()
        );

        self.download(url, destination).inspect_err(|err| {
            error!(url = %url, destination = %destination.display(), error = %err, "Download failed");
        })
    }

    /// Download only when `destination` does not exist yet. Returns whether a
    /// download happened.
    pub fn fetch_if_missing(&self, url: &str, destination: &Path) -> Result<bool, SourceError> {
        if destination.exists() {
            info!("Using existing archive {}", destination.display());
            return Ok(false);
        }
        self.fetch(url, destination)?;
        Ok(true)
    }

    fn download(&self, url: &str, destination: &Path) -> Result<u64, SourceError> {
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| SourceError::io(parent, e))?;
        }

        let body = self.transport.get_bytes(url)?;
        let staging = staging_path(destination);
        fs::write(&staging, &body).map_err(|e| SourceError::io(&staging, e))?;
        fs::rename(&staging, destination).map_err(|e| SourceError::io(destination, e))?;

        Ok(body.len() as u64)
    }
}

fn staging_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    destination.with_file_name(name)
}
