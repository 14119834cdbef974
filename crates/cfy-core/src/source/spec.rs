//! Blueprint source classification.

use std::path::{Path, PathBuf};

use url::Url;

use crate::archive::{self, ArchiveKind};
use crate::error::SourceError;

use super::shorthand::RepoShorthand;

/// A blueprint reference, classified by cheap syntactic checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlueprintSource {
    /// A definition file on the local filesystem
    LocalFile(PathBuf),
    /// A supported archive on the local filesystem
    LocalArchive { path: PathBuf, kind: ArchiveKind },
    /// A supported archive behind an http(s) URL
    RemoteArchiveUrl { url: String, kind: ArchiveKind },
    /// `organization/repository[:ref]` on the hosted repository service
    RepoShorthand(RepoShorthand),
}

impl BlueprintSource {
    /// Classify a user-supplied reference.
    ///
    /// Order of checks:
    /// 1. `http://` / `https://` URL -> remote archive (extension must be supported)
    /// 2. supported archive extension -> local archive
    /// 3. `.yaml` / `.yml` -> local definition file
    /// 4. unsupported archive extension -> error
    /// 5. existing regular file -> local definition file
    /// 6. `org/repo[:ref]` -> repository shorthand
    pub fn classify(reference: &str) -> Result<Self, SourceError> {
        if let Some(url) = parse_http_url(reference) {
            let kind = ArchiveKind::from_name(url.path())
                .ok_or_else(|| SourceError::UnsupportedArchive(reference.to_string()))?;
            return Ok(Self::RemoteArchiveUrl {
                url: reference.to_string(),
                kind,
            });
        }

        let path = Path::new(reference);

        if let Some(kind) = ArchiveKind::from_name(reference) {
            if !path.is_file() {
                return Err(SourceError::not_found(format!(
                    "no archive at {}",
                    path.display()
                )));
            }
            return Ok(Self::LocalArchive {
                path: path.to_path_buf(),
                kind,
            });
        }

        if is_definition_file_name(reference) {
            if !path.is_file() {
                return Err(SourceError::not_found(format!(
                    "no such file {}",
                    path.display()
                )));
            }
            return Ok(Self::LocalFile(path.to_path_buf()));
        }

        if archive::unsupported_extension(reference).is_some() {
            return Err(SourceError::UnsupportedArchive(reference.to_string()));
        }

        if path.is_file() {
            return Ok(Self::LocalFile(path.to_path_buf()));
        }

        if path.is_dir() {
            return Err(SourceError::not_found(format!(
                "{} is a directory, expected a blueprint file or archive",
                path.display()
            )));
        }

        if let Some(shorthand) = RepoShorthand::parse(reference) {
            return Ok(Self::RepoShorthand(shorthand));
        }

        Err(SourceError::not_found(format!(
            "{reference} is neither a local path, a URL, nor an `organization/repository[:ref]` reference"
        )))
    }

    /// Check if this source needs a temporary extraction directory.
    pub fn is_archive(&self) -> bool {
        !matches!(self, Self::LocalFile(_))
    }
}

fn parse_http_url(reference: &str) -> Option<Url> {
    let url = Url::parse(reference).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}

fn is_definition_file_name(reference: &str) -> bool {
    let lower = reference.to_ascii_lowercase();
    lower.ends_with(".yaml") || lower.ends_with(".yml")
}
