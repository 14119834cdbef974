//! Archive extraction into a directory.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::SourceError;

use super::ArchiveKind;

/// Extract `archive` of the given kind into `dest`.
///
/// `dest` is created when missing. Entries that would escape `dest` are
/// skipped.
pub fn extract(kind: ArchiveKind, archive: &Path, dest: &Path) -> Result<(), SourceError> {
    std::fs::create_dir_all(dest).map_err(|e| SourceError::extraction(dest, e))?;

    let file = File::open(archive).map_err(|e| SourceError::extraction(archive, e))?;

    tracing::debug!(
        archive = %archive.display(),
        dest = %dest.display(),
        %kind,
        "extracting blueprint archive"
    );

    match kind {
        ArchiveKind::Zip => extract_zip(file, archive, dest),
        ArchiveKind::Tar => unpack_tar(file, archive, dest),
        ArchiveKind::TarGz => unpack_tar(flate2::read::GzDecoder::new(file), archive, dest),
        ArchiveKind::TarBz2 => unpack_tar(bzip2::read::BzDecoder::new(file), archive, dest),
    }
}

fn unpack_tar<R: Read>(reader: R, archive: &Path, dest: &Path) -> Result<(), SourceError> {
    let mut tar = tar::Archive::new(reader);
    tar.unpack(dest)
        .map_err(|e| SourceError::extraction(archive, e))
}

fn extract_zip(file: File, archive: &Path, dest: &Path) -> Result<(), SourceError> {
    let mut zip = zip::ZipArchive::new(file)
        .map_err(|e| SourceError::extraction(archive, format!("not a zip archive: {e}")))?;

    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| SourceError::extraction(archive, format!("entry {i}: {e}")))?;

        let outpath = match entry.enclosed_name() {
            Some(path) => dest.join(path),
            None => continue,
        };

        if entry.is_dir() {
            std::fs::create_dir_all(&outpath).map_err(|e| SourceError::extraction(&outpath, e))?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SourceError::extraction(parent, e))?;
        }

        let mut outfile =
            File::create(&outpath).map_err(|e| SourceError::extraction(&outpath, e))?;
        std::io::copy(&mut entry, &mut outfile)
            .map_err(|e| SourceError::extraction(archive, format!("{}: {e}", entry.name())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode)).ok();
            }
        }
    }

    Ok(())
}
