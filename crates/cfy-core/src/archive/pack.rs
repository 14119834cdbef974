//! Packing a blueprint directory for upload.

use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

/// Pack `dir` into an in-memory `tar.gz` archive.
///
/// Entries are placed under a single top-level directory named after `dir`,
/// which is the layout the manager expects for uploaded blueprints.
pub fn pack_directory(dir: &Path) -> std::io::Result<Vec<u8>> {
    let top_level = dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "blueprint".to_string());

    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.follow_symlinks(false);
    builder.append_dir_all(&top_level, dir)?;

    let encoder = builder.into_inner()?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn packs_directory_under_top_level_name() {
        let temp = tempfile::TempDir::new().expect("Failed to create temp dir");
        let dir = temp.path().join("hello-world");
        std::fs::create_dir_all(dir.join("scripts")).expect("Failed to create dir");
        std::fs::write(dir.join("blueprint.yaml"), "x: 1\n").expect("Failed to write");
        std::fs::write(dir.join("scripts").join("run.sh"), "echo\n").expect("Failed to write");

        let bytes = pack_directory(&dir).expect("Packing should succeed");

        let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(bytes.as_slice()));
        let mut names = Vec::new();
        for entry in archive.entries().expect("Should list entries") {
            let mut entry = entry.expect("Should read entry");
            let path = entry.path().expect("Should have path").to_string_lossy().into_owned();
            if path.ends_with("blueprint.yaml") {
                let mut content = String::new();
                entry.read_to_string(&mut content).expect("Should read content");
                assert_eq!(content, "x: 1\n");
            }
            names.push(path);
        }

        assert!(names.iter().all(|n| n.starts_with("hello-world")));
        assert!(names.iter().any(|n| n == "hello-world/blueprint.yaml"));
        assert!(names.iter().any(|n| n == "hello-world/scripts/run.sh"));
    }
}
