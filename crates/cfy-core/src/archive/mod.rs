//! Blueprint archive handling
//!
//! Detects the archive kind from a file name, extracts archives into a
//! directory, and packs blueprint directories for upload.

mod extract;
mod pack;

pub use extract::extract;
pub use pack::pack_directory;

use serde::{Deserialize, Serialize};

/// Archive kinds accepted as a blueprint source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchiveKind {
    Zip,
    Tar,
    TarGz,
    TarBz2,
}

/// Extensions that look like archives but are not accepted.
///
/// Compound extensions come first so `tar.xz` wins over `xz`.
const UNSUPPORTED_EXTENSIONS: &[&str] = &[
    ".tar.xz", ".tar.zst", ".tar.lz", ".rar", ".7z", ".tgz", ".tbz", ".tbz2", ".txz", ".gz",
    ".bz2", ".xz", ".zst", ".lz", ".lzma", ".z", ".cab", ".iso", ".jar", ".war",
];

impl ArchiveKind {
    /// All supported kinds, longest extension first.
    pub const ALL: [ArchiveKind; 4] = [Self::TarGz, Self::TarBz2, Self::Tar, Self::Zip];

    /// File extension including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Zip => ".zip",
            Self::Tar => ".tar",
            Self::TarGz => ".tar.gz",
            Self::TarBz2 => ".tar.bz2",
        }
    }

    /// Detect a supported archive kind from a file name or path.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| lower.ends_with(kind.extension()))
    }

    /// Strip this kind's extension from a file name.
    ///
    /// Returns the name unchanged when it does not carry the extension.
    pub fn strip_extension(self, name: &str) -> &str {
        let split = name.len().saturating_sub(self.extension().len());
        match (name.get(..split), name.get(split..)) {
            (Some(stem), Some(tail)) if tail.eq_ignore_ascii_case(self.extension()) => stem,
            _ => name,
        }
    }
}

impl std::fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.extension()[1..])
    }
}

/// Returns the unsupported archive extension a name ends with, if any.
pub fn unsupported_extension(name: &str) -> Option<&'static str> {
    if ArchiveKind::from_name(name).is_some() {
        return None;
    }
    let lower = name.to_ascii_lowercase();
    UNSUPPORTED_EXTENSIONS
        .iter()
        .copied()
        .find(|ext| lower.ends_with(ext))
}
