//! TAR extraction, plain or gzip-compressed.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::debug;

use super::sanitize_entry_path;
use crate::error::Result;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Compression {
    None,
    Gzip,
}

pub(crate) fn extract(archive: &Path, to: &Path, compression: Compression) -> Result<Vec<PathBuf>> {
    let file = File::open(archive)?;
    match compression {
        Compression::None => extract_entries(Archive::new(file), to),
        Compression::Gzip => extract_entries(Archive::new(GzDecoder::new(file)), to),
    }
}

fn extract_entries<R: Read>(mut archive: Archive<R>, to: &Path) -> Result<Vec<PathBuf>> {
    let mut extracted = Vec::new();
    for entry in archive.entries()? {
        let mut entry = entry?;
        let entry_path = entry.path()?.into_owned();
        let Some(target) = sanitize_entry_path(to, &entry_path) else {
            debug!("Skipping unsafe archive entry {}", entry_path.display());
            continue;
        };
        let entry_type = entry.header().entry_type();
        if entry_type.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if !entry_type.is_file() {
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        entry.unpack(&target)?;
        extracted.push(target);
    }
    Ok(extracted)
}
