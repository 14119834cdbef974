//! Blueprint source resolver implementation.

use std::cell::Cell;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::archive::{self, ArchiveKind};
use crate::error::SourceError;

use super::fetch::{ArchiveFetcher, HttpFetcher};
use super::identity::archive_identity;
use super::shorthand::{GitHubResolver, ShorthandResolver};
use super::spec::BlueprintSource;

/// Prefix of every temporary directory created by the resolver.
const TEMP_DIR_PREFIX: &str = "cfy-blueprint-";

/// Extraction root for downloaded archives; the download sits beside it.
const EXTRACT_DIR: &str = "extracted";

/// A blueprint definition file ready to be read locally.
///
/// When [`is_temporary`](Self::is_temporary) is true the caller owns the
/// temporary directory and must remove it, typically through
/// [`cleanup_guard`](Self::cleanup_guard).
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedBlueprint {
    local_path: PathBuf,
    temp_dir: Option<PathBuf>,
    derived_id: String,
    #[serde(skip)]
    guard_issued: Cell<bool>,
}

impl ResolvedBlueprint {
    /// Path to the definition file.
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// Whether a temporary directory was created for this blueprint.
    pub fn is_temporary(&self) -> bool {
        self.temp_dir.is_some()
    }

    /// The temporary directory that holds the extracted blueprint, if any.
    pub fn temp_dir(&self) -> Option<&Path> {
        self.temp_dir.as_deref()
    }

    /// Fallback identifier derived from the source location.
    pub fn derived_id(&self) -> &str {
        &self.derived_id
    }

    /// A guard that removes the temporary directory when dropped.
    ///
    /// Only the first guard owns the directory; later calls, and calls for
    /// non-temporary blueprints, return a guard that does nothing.
    pub fn cleanup_guard(&self) -> TempDirGuard {
        let dir = if self.guard_issued.replace(true) {
            None
        } else {
            self.temp_dir.clone()
        };
        TempDirGuard { dir }
    }
}

/// Removes a directory tree on drop.
#[derive(Debug)]
#[must_use = "the directory is removed as soon as the guard is dropped"]
pub struct TempDirGuard {
    dir: Option<PathBuf>,
}

impl TempDirGuard {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Give up ownership without removing the directory.
    pub fn release(mut self) -> Option<PathBuf> {
        self.dir.take()
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            tracing::debug!(dir = %dir.display(), "removing temporary blueprint directory");
            if let Err(e) = std::fs::remove_dir_all(&dir) {
                tracing::warn!("Failed to remove temporary directory {}: {}", dir.display(), e);
            }
        }
    }
}

/// Resolves blueprint references into local definition files.
#[derive(Debug)]
pub struct BlueprintResolver {
    /// Directory under which temporary extraction directories are created
    temp_root: PathBuf,
    fetcher: Box<dyn ArchiveFetcher>,
    shorthand: Box<dyn ShorthandResolver>,
}

impl Default for BlueprintResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl BlueprintResolver {
    /// Create a resolver that downloads over HTTP and maps shorthands to GitHub.
    pub fn new() -> Self {
        Self {
            temp_root: std::env::temp_dir(),
            fetcher: Box::new(HttpFetcher::new()),
            shorthand: Box::new(GitHubResolver::default()),
        }
    }

    pub fn with_temp_root(mut self, temp_root: impl Into<PathBuf>) -> Self {
        self.temp_root = temp_root.into();
        self
    }

    pub fn with_fetcher(mut self, fetcher: impl ArchiveFetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    pub fn with_shorthand_resolver(mut self, resolver: impl ShorthandResolver + 'static) -> Self {
        self.shorthand = Box::new(resolver);
        self
    }

    /// Resolve `reference` to a local file named `definition_filename`.
    ///
    /// Local definition files are returned as-is. Archives (local, remote, or
    /// shorthand) are extracted into a fresh temporary directory whose
    /// ownership passes to the caller. On failure, any directory created here
    /// is removed before returning.
    pub fn resolve(
        &self,
        reference: &str,
        definition_filename: &str,
    ) -> Result<ResolvedBlueprint, SourceError> {
        let source = BlueprintSource::classify(reference)?;
        tracing::debug!(?source, "classified blueprint source");
        self.resolve_source(source, definition_filename)
    }

    /// Resolve an already classified source.
    pub fn resolve_source(
        &self,
        source: BlueprintSource,
        definition_filename: &str,
    ) -> Result<ResolvedBlueprint, SourceError> {
        match source {
            BlueprintSource::LocalFile(path) => Ok(ResolvedBlueprint {
                derived_id: archive_identity(&path),
                local_path: path,
                temp_dir: None,
                guard_issued: Cell::new(false),
            }),
            BlueprintSource::LocalArchive { path, kind } => {
                self.with_temp_dir(|temp| Self::materialize(&path, kind, temp, definition_filename))
            }
            BlueprintSource::RemoteArchiveUrl { url, kind } => self.with_temp_dir(|temp| {
                let archive = self.fetcher.fetch(&url, temp)?;
                Self::materialize(&archive, kind, &temp.join(EXTRACT_DIR), definition_filename)
            }),
            BlueprintSource::RepoShorthand(shorthand) => {
                let url = self.shorthand.archive_url(&shorthand)?;
                tracing::debug!(%shorthand, %url, "resolved repository shorthand");
                self.with_temp_dir(|temp| {
                    let archive = self.fetcher.fetch(&url, temp)?;
                    let kind = ArchiveKind::from_name(&url)
                        .or_else(|| ArchiveKind::from_name(&archive.to_string_lossy()))
                        .ok_or_else(|| SourceError::UnsupportedArchive(url.clone()))?;
                    Self::materialize(&archive, kind, &temp.join(EXTRACT_DIR), definition_filename)
                })
            }
        }
    }

    /// Run `work` inside a fresh temporary directory, removing it on failure.
    fn with_temp_dir<F>(&self, work: F) -> Result<ResolvedBlueprint, SourceError>
    where
        F: FnOnce(&Path) -> Result<(PathBuf, String), SourceError>,
    {
        let temp = self.create_temp_dir()?;
        let guard = TempDirGuard::new(&temp);

        let (local_path, derived_id) = work(&temp)?;

        let temp_dir = guard.release();
        Ok(ResolvedBlueprint {
            local_path,
            temp_dir,
            derived_id,
            guard_issued: Cell::new(false),
        })
    }

    fn create_temp_dir(&self) -> Result<PathBuf, SourceError> {
        let dir = tempfile::Builder::new()
            .prefix(TEMP_DIR_PREFIX)
            .tempdir_in(&self.temp_root)
            .map_err(|e| {
                SourceError::extraction(
                    &self.temp_root,
                    format!("failed to create temporary directory: {e}"),
                )
            })?;
        Ok(dir.keep())
    }

    /// Extract `archive` into `dest` and locate the definition file.
    ///
    /// Returns the definition path and the id derived from the archive's
    /// location before extraction.
    fn materialize(
        archive: &Path,
        kind: ArchiveKind,
        dest: &Path,
        definition_filename: &str,
    ) -> Result<(PathBuf, String), SourceError> {
        archive::extract(kind, archive, dest)?;
        let local_path = locate_definition(dest, definition_filename).ok_or_else(|| {
            SourceError::not_found(format!(
                "{} not found in archive {}",
                definition_filename,
                archive.display()
            ))
        })?;
        Ok((local_path, archive_identity(archive)))
    }
}

/// Find `filename` at the extraction root, or inside the single top-level
/// directory when the archive wraps its contents in one.
fn locate_definition(root: &Path, filename: &str) -> Option<PathBuf> {
    let direct = root.join(filename);
    if direct.is_file() {
        return Some(direct);
    }

    let mut dirs = std::fs::read_dir(root)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir());

    let only = dirs.next()?;
    if dirs.next().is_some() {
        return None;
    }

    let nested = only.join(filename);
    nested.is_file().then_some(nested)
}
