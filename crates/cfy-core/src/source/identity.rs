//! Deterministic identifiers derived from a blueprint's location.

use std::path::Path;

use crate::archive::ArchiveKind;

/// Derive an identifier from an archive (or definition file) location.
///
/// The result is the parent directory's base name with `-` replaced by `_`,
/// an underscore, and the file stem. Supported archive extensions are
/// stripped whole (`hello.tar.gz` -> `hello`); any other file loses only its
/// last extension. Only the path string is consulted.
///
/// ```
/// use cfy_core::source::archive_identity;
///
/// assert_eq!(archive_identity("/a/my-repo/bp.zip"), "my_repo_bp");
/// assert_eq!(archive_identity("/tmp/demo-blueprints/hello.tar.gz"), "demo_blueprints_hello");
/// ```
pub fn archive_identity(location: impl AsRef<Path>) -> String {
    let location = location.as_ref();

    let file_name = location
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let stem = match ArchiveKind::from_name(&file_name) {
        Some(kind) => kind.strip_extension(&file_name).to_string(),
        None => Path::new(&file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    let dir_name = location
        .parent()
        .and_then(|parent| parent.file_name())
        .map(|n| n.to_string_lossy().replace('-', "_"))
        .unwrap_or_default();

    format!("{dir_name}_{stem}")
}
