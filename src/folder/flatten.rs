//! Folder-tree flattening.
//!
//! Turns a resolved [`DriveNode`] tree into the ordered list of relative
//! paths consumed by folder listing and folder download. The walk is
//! depth-first pre-order: a folder's placeholder entry is emitted and its
//! children are descended into immediately, before the folder's next sibling.
//! Every ancestor directory therefore appears before anything beneath it.
//! The root itself gets no entry; its name only ever becomes the destination
//! directory's own name.

use std::path::{Path, PathBuf};

use super::DriveNode;
use crate::resolve::direct_download_url;
use crate::utils::sanitize_filename;

/// One row of the linearized folder listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedEntry {
    /// Path relative to the folder root, with sanitized components.
    pub path: PathBuf,
    /// Resource identifier; `None` marks a directory placeholder.
    pub id: Option<String>,
}

impl FlattenedEntry {
    /// Whether this entry stands for a directory rather than a file.
    pub fn is_dir(&self) -> bool {
        self.id.is_none()
    }

    /// The direct-download URL for a file entry.
    pub fn download_url(&self) -> Option<String> {
        self.id.as_deref().map(direct_download_url)
    }
}

/// Flattens a resolved tree into its ordered entries.
pub fn flatten(root: &DriveNode) -> Vec<FlattenedEntry> {
    let mut entries = Vec::new();
    walk(root, Path::new(""), &mut entries);
    entries
}

fn walk(node: &DriveNode, prefix: &Path, entries: &mut Vec<FlattenedEntry>) {
    for child in &node.children {
        let path = prefix.join(sanitize_filename(&child.name));
        if child.is_folder() {
            entries.push(FlattenedEntry {
                path: path.clone(),
                id: None,
            });
            walk(child, &path, entries);
        } else {
            entries.push(FlattenedEntry {
                path,
                id: Some(child.id.clone()),
            });
        }
    }
}
