//! Local archive extraction.
//!
//! Runs after a download completes, typically as the cache's postprocess
//! callback. Supported formats are selected by extension: `.zip` through the
//! zip crate, `.tar` / `.tar.gz` / `.tgz` through tar + flate2. Entry paths
//! are sanitized so no archive member can land outside the destination
//! directory.

pub mod tar;
pub mod zip;

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Extracts an archive and returns the extracted file paths.
///
/// `to` defaults to the archive's own directory. An extension outside the
/// supported set fails with [`Error::UnsupportedArchive`].
pub fn extract_all(archive: &Path, to: Option<&Path>) -> Result<Vec<PathBuf>> {
    let destination = match to {
        Some(path) => path.to_path_buf(),
        None => archive
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let name = archive.to_string_lossy();
    if name.ends_with(".zip") {
        zip::extract(archive, &destination)
    } else if name.ends_with(".tar") {
        tar::extract(archive, &destination, tar::Compression::None)
    } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        tar::extract(archive, &destination, tar::Compression::Gzip)
    } else {
        Err(Error::UnsupportedArchive(name.into_owned()))
    }
}

/// Joins an archive entry path onto the destination, refusing absolute
/// paths and parent-directory traversal.
pub(crate) fn sanitize_entry_path(base: &Path, entry: &Path) -> Option<PathBuf> {
    let mut target = base.to_path_buf();
    for component in entry.components() {
        match component {
            Component::Normal(part) => target.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(target)
}
