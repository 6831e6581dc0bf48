//! ZIP extraction.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::ZipArchive;

use crate::error::Result;

pub(crate) fn extract(archive: &Path, to: &Path) -> Result<Vec<PathBuf>> {
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(file)?;
    let mut extracted = Vec::new();

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        // enclosed_name refuses absolute and traversal paths.
        let Some(relative) = entry.enclosed_name() else {
            debug!("Skipping unsafe archive entry {}", entry.name());
            continue;
        };
        let target = to.join(relative);
        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut output = File::create(&target)?;
        io::copy(&mut entry, &mut output)?;
        extracted.push(target);
    }
    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    #[test]
    fn test_extract_zip_tree() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("bundle.zip");

        let file = File::create(&archive_path).unwrap();
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        writer.add_directory("nested", options).unwrap();
        writer.start_file("top.txt", options).unwrap();
        writer.write_all(b"top level").unwrap();
        writer.start_file("nested/inner.txt", options).unwrap();
        writer.write_all(b"inner file").unwrap();
        writer.finish().unwrap();

        let out = dir.path().join("out");
        let extracted = extract(&archive_path, &out).unwrap();

        assert_eq!(extracted.len(), 2);
        assert_eq!(fs::read(out.join("top.txt")).unwrap(), b"top level");
        assert_eq!(
            fs::read(out.join("nested/inner.txt")).unwrap(),
            b"inner file"
        );
    }
}
