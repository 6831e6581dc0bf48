//! Recursive folder-tree resolution, listing, and download.
//!
//! Folder contents are discovered by fetching the folder's HTML page and
//! decoding the manifest embedded in it (see [`manifest`]); subfolders are
//! fetched recursively, one page at a time, and assembled bottom-up into an
//! owned [`DriveNode`] tree. The tree is then flattened (see [`flatten`])
//! into the ordered listing that drives both [`list_folder`] and
//! [`download_folder`].
//!
//! The provider returns at most 50 entries per folder page to this interface
//! and offers no way to page further; a folder that hits the ceiling is
//! rejected as known-incomplete unless the caller explicitly accepts
//! truncated listings.
//!
//! # Examples
//!
//! ```rust,no_run
//! use drivedl::folder::{download_folder, FolderOptions, FolderRef};
//!
//! # async fn example() -> drivedl::Result<()> {
//! let options = FolderOptions::default();
//! let files = download_folder(
//!     &FolderRef::Id("1gG8rmSXKXRHjHNMPs2fxCdcbcFnyAsr8"),
//!     None,
//!     &options,
//! )
//! .await?;
//! println!("downloaded {} files", files.len());
//! # Ok(())
//! # }
//! ```

pub mod flatten;
pub mod manifest;

pub use flatten::{flatten, FlattenedEntry};
pub use manifest::{HttpManifestSource, ManifestSource, FOLDER_MIME_TYPE};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Url;
use tokio::fs;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::http::create_http_client;
use crate::transfer::{download_with_client, TransferConfig};
use crate::utils::sanitize_filename;

/// Maximum number of direct children the provider serves on one folder page.
pub const MAX_FOLDER_ENTRIES: usize = 50;

const FOLDERS_URL: &str = "https://drive.google.com/drive/folders/";

/// One file or folder discovered during folder traversal.
///
/// A node owns its children outright; the provider's data is acyclic, and
/// the resolver guards against identifier revisits anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveNode {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    /// Children in manifest order, not sorted.
    pub children: Vec<DriveNode>,
}

impl DriveNode {
    /// Whether this node is a folder.
    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME_TYPE
    }
}

/// Names a folder either by share URL or by bare identifier.
#[derive(Debug, Clone, Copy)]
pub enum FolderRef<'a> {
    Url(&'a str),
    Id(&'a str),
}

impl FolderRef<'_> {
    fn to_url(self) -> String {
        match self {
            FolderRef::Url(url) => url.to_string(),
            FolderRef::Id(id) => format!("{}{}", FOLDERS_URL, id),
        }
    }
}

/// Settings for folder listing and download.
#[derive(Debug, Clone, Default)]
pub struct FolderOptions {
    /// Transfer settings shared by the page fetches and the file downloads.
    pub transfer: TransferConfig,
    /// Accept a listing that hits the page-size ceiling even though it is
    /// known to be incomplete.
    pub allow_large: bool,
}

/// Resolves a folder URL into its tree of files and subfolders.
///
/// Fetches are strictly sequential, one page per node. Resolution fails as a
/// whole on the first undecodable page, and on any folder whose direct-child
/// count hits [`MAX_FOLDER_ENTRIES`] unless `allow_large` is set.
pub async fn resolve_folder<S: ManifestSource + ?Sized>(
    source: &S,
    url: &str,
    allow_large: bool,
) -> Result<DriveNode> {
    let mut visited = HashSet::new();
    resolve_into(source, url.to_string(), allow_large, &mut visited).await
}

fn resolve_into<'a, S: ManifestSource + ?Sized>(
    source: &'a S,
    url: String,
    allow_large: bool,
    visited: &'a mut HashSet<String>,
) -> BoxFuture<'a, Result<DriveNode>> {
    async move {
        let id = folder_id_from_url(&url);
        if !visited.insert(id.clone()) {
            return Err(Error::FolderParse(format!(
                "folder {} was already visited; the listing links back to itself",
                id
            )));
        }

        debug!("Retrieving folder page {}", url);
        let html = source.fetch_page(&url).await?;
        let page = manifest::parse_folder_page(&html)?;

        let mut node = DriveNode {
            id,
            name: page.name,
            mime_type: FOLDER_MIME_TYPE.to_string(),
            children: Vec::new(),
        };

        for row in page.rows {
            if row.mime_type == FOLDER_MIME_TYPE {
                info!("Retrieving folder {} {}", row.id, row.name);
                let child_url = format!("{}{}", FOLDERS_URL, row.id);
                let child = resolve_into(source, child_url, allow_large, visited).await?;
                node.children.push(child);
            } else {
                debug!("Processing file {} {}", row.id, row.name);
                node.children.push(DriveNode {
                    id: row.id,
                    name: row.name,
                    mime_type: row.mime_type,
                    children: Vec::new(),
                });
            }
        }

        if node.children.len() == MAX_FOLDER_ENTRIES && !allow_large {
            return Err(Error::FolderIncomplete(node.children.len()));
        }
        Ok(node)
    }
    .boxed()
}

/// The folder identifier is the last path segment of its URL.
fn folder_id_from_url(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
                .map(String::from)
        })
        .unwrap_or_else(|| url.to_string())
}

/// Resolves a folder and returns its flattened listing.
///
/// File entries carry a direct-download URL; directory placeholders carry
/// none. The listing order is the download order.
pub async fn list_folder(
    folder: &FolderRef<'_>,
    options: &FolderOptions,
) -> Result<Vec<FlattenedEntry>> {
    let client = create_http_client(&options.transfer)?;
    let source = HttpManifestSource::new(&client);
    info!("Retrieving folder contents");
    let root = resolve_folder(&source, &folder.to_url(), options.allow_large).await?;
    Ok(flatten(&root))
}

/// Downloads a folder tree, mirroring its structure under `output`.
///
/// Output rules: `None` roots the tree at `<current dir>/<folder name>`; a
/// path with a trailing separator has the folder name joined onto it; any
/// other path *is* the root directory. With resume enabled, files already
/// present are skipped. Returns the local paths of all downloaded files.
pub async fn download_folder(
    folder: &FolderRef<'_>,
    output: Option<&Path>,
    options: &FolderOptions,
) -> Result<Vec<PathBuf>> {
    let client = create_http_client(&options.transfer)?;
    let source = HttpManifestSource::new(&client);
    info!("Retrieving folder contents");
    let root = resolve_folder(&source, &folder.to_url(), options.allow_large).await?;

    debug!("Building directory structure");
    let entries = flatten(&root);
    let root_dir = match output {
        None => std::env::current_dir()?.join(sanitize_filename(&root.name)),
        Some(path) if has_trailing_separator(path) => {
            path.join(sanitize_filename(&root.name))
        }
        Some(path) => path.to_path_buf(),
    };

    info!("Creating directory {}", root_dir.display());
    fs::create_dir_all(&root_dir).await?;

    let config = &options.transfer;
    let mut downloaded = Vec::new();
    for entry in entries {
        let local_path = root_dir.join(&entry.path);
        match entry.download_url() {
            None => {
                fs::create_dir_all(&local_path).await?;
            }
            Some(url) => {
                if config.resume() && local_path.is_file() {
                    debug!("Skipping already downloaded file {}", local_path.display());
                    downloaded.push(local_path);
                    continue;
                }
                let path =
                    download_with_client(&client, &url, Some(local_path.as_path()), config).await?;
                downloaded.push(path);
            }
        }
    }
    info!("Download completed");
    Ok(downloaded)
}

fn has_trailing_separator(path: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .ends_with(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_ref_to_url() {
        assert_eq!(
            FolderRef::Id("ABC").to_url(),
            "https://drive.google.com/drive/folders/ABC"
        );
        assert_eq!(
            FolderRef::Url("https://drive.google.com/drive/folders/XYZ").to_url(),
            "https://drive.google.com/drive/folders/XYZ"
        );
    }

    #[test]
    fn test_folder_id_from_url_ignores_query() {
        assert_eq!(
            folder_id_from_url("https://drive.google.com/drive/folders/ABC?hl=en"),
            "ABC"
        );
    }

    #[test]
    fn test_has_trailing_separator() {
        assert!(has_trailing_separator(Path::new("downloads/")));
        assert!(!has_trailing_separator(Path::new("downloads")));
    }
}
