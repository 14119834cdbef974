//! Downloading remote blueprint archives.

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::SourceError;

/// Fallback file name when a URL has no usable last path segment.
const DEFAULT_ARCHIVE_NAME: &str = "blueprint-archive";

/// Downloads a remote archive into a local directory.
pub trait ArchiveFetcher: std::fmt::Debug {
    /// Download `url` into `dest_dir`, returning the path of the written file.
    fn fetch(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, SourceError>;
}

/// Fetches archives over HTTP(S) with reqwest.
#[derive(Debug, Default, Clone)]
pub struct HttpFetcher;

impl HttpFetcher {
    pub fn new() -> Self {
        Self
    }

    async fn download(url: &str) -> Result<Vec<u8>, SourceError> {
        let response = reqwest::get(url)
            .await
            .map_err(|e| SourceError::transport(url, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::not_found(format!("{url} (HTTP 404)")));
        }
        if !status.is_success() {
            return Err(SourceError::transport(url, format!("HTTP {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::transport(url, format!("failed to read body: {e}")))?;

        Ok(bytes.to_vec())
    }
}

impl ArchiveFetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, SourceError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SourceError::transport(url, format!("failed to start runtime: {e}")))?;

        tracing::info!("Downloading {}...", url);
        let bytes = runtime.block_on(Self::download(url))?;

        let target = dest_dir.join(archive_file_name(url));
        std::fs::write(&target, &bytes).map_err(|e| {
            SourceError::transport(url, format!("failed to write {}: {e}", target.display()))
        })?;

        tracing::debug!(path = %target.display(), bytes = bytes.len(), "archive downloaded");
        Ok(target)
    }
}

/// File name to store a downloaded archive under: the URL's last path segment.
pub fn archive_file_name(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string())
}
