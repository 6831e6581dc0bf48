//! Folder-page manifest decoding.
//!
//! The provider does not expose a listing API to unauthenticated clients;
//! a folder's contents are embedded in its HTML page as the second
//! single-quoted string literal of an inline script block (the first is a
//! session token). That literal is a JSON document encoded as a JS string
//! with non-standard `\xHH` hex escapes, which must be rewritten to `\u00HH`
//! before a JSON string decoder will accept them.
//!
//! Fetching is abstracted behind [`ManifestSource`] so a recorded fixture can
//! stand in for the live provider without touching the tree-walking logic.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::StatusCode;
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;

use crate::error::{Error, Result};
use crate::resolve;

/// Mime type marking a manifest row as a subfolder.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Token identifying the script block that carries the manifest.
const MANIFEST_MARKER: &str = "_DRIVE_ivd";

/// Separator between the folder name and the provider suffix in the page
/// title. Parsing is locale-sensitive through this separator, which is why
/// fetches pin the page locale.
const TITLE_SEPARATOR: &str = " - ";

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<script[^>]*>(.*?)</script>").expect("hard-coded pattern"));

static QUOTED_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'((?:[^'\\]|\\.)*)'").expect("hard-coded pattern"));

static HEX_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\x([0-9A-Fa-f]{2})").expect("hard-coded pattern"));

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<title>(.*?)</title>").expect("hard-coded pattern"));

/// Where folder pages come from.
///
/// The live implementation is [`HttpManifestSource`]; tests substitute
/// recorded pages.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Fetches the raw HTML of the page at `url`.
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

/// Fetches folder pages over HTTP through the shared transfer client.
pub struct HttpManifestSource<'a> {
    client: &'a ClientWithMiddleware,
}

impl<'a> HttpManifestSource<'a> {
    pub fn new(client: &'a ClientWithMiddleware) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManifestSource for HttpManifestSource<'_> {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        // Pin the page locale: the title separator parsing depends on it.
        let mut target = url.to_string();
        if let Ok(parsed) = Url::parse(url) {
            if resolve::is_drive_url(&parsed) {
                target.push(if target.contains('?') { '&' } else { '?' });
                target.push_str("hl=en");
            }
        }
        let res = self.client.get(&target).send().await?;
        if res.status() != StatusCode::OK {
            return Err(Error::Status(res.status()));
        }
        Ok(res.text().await?)
    }
}

/// One row of the decoded manifest: `[id, _, name, mimeType, ...]` with any
/// trailing elements ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ManifestRow {
    pub id: String,
    pub name: String,
    pub mime_type: String,
}

/// The decoded contents of one folder page.
#[derive(Debug, Clone)]
pub(crate) struct FolderPage {
    /// Folder display name, from the page title.
    pub name: String,
    /// Direct children in manifest order.
    pub rows: Vec<ManifestRow>,
}

/// Decodes a folder page into its name and direct children.
pub(crate) fn parse_folder_page(html: &str) -> Result<FolderPage> {
    let encoded = SCRIPT_BLOCK
        .captures_iter(html)
        .map(|caps| unescape_html(&caps[1]))
        .filter(|block| block.contains(MANIFEST_MARKER))
        .find_map(|block| {
            QUOTED_LITERAL
                .captures_iter(&block)
                .nth(1)
                .map(|caps| caps[1].to_string())
        })
        .ok_or_else(|| {
            Error::FolderParse("could not find the folder manifest in the page".to_string())
        })?;

    let decoded = decode_js_string(&encoded)?;
    let manifest: serde_json::Value = serde_json::from_str(&decoded)?;

    let mut rows = Vec::new();
    if let Some(items) = manifest.get(0).and_then(|value| value.as_array()) {
        for item in items {
            let Some(row) = item.as_array() else { continue };
            if row.len() < 4 {
                continue;
            }
            let (Some(id), Some(name), Some(mime_type)) =
                (row[0].as_str(), row[2].as_str(), row[3].as_str())
            else {
                continue;
            };
            rows.push(ManifestRow {
                id: id.to_string(),
                name: name.to_string(),
                mime_type: mime_type.to_string(),
            });
        }
    }

    Ok(FolderPage {
        name: folder_name_from_title(html)?,
        rows,
    })
}

/// Rewrites `\xHH` escapes to `\u00HH` and decodes the result as a JSON
/// string literal.
pub(crate) fn decode_js_string(encoded: &str) -> Result<String> {
    let normalized = HEX_ESCAPE.replace_all(encoded, r"\u00$1");
    let quoted = format!("\"{}\"", normalized);
    Ok(serde_json::from_str(&quoted)?)
}

/// Extracts the folder name from the page title.
///
/// The provider appends a fixed suffix after the last `" - "`; everything
/// before it, rejoined, is the folder's own name. A title without the
/// separator means the page is not a folder listing.
fn folder_name_from_title(html: &str) -> Result<String> {
    let title = TITLE
        .captures(html)
        .map(|caps| unescape_html(&caps[1]))
        .ok_or_else(|| Error::FolderParse("folder page has no title".to_string()))?;
    let parts: Vec<&str> = title.split(TITLE_SEPARATOR).collect();
    if parts.len() < 2 {
        return Err(Error::FolderParse(format!(
            "folder name cannot be extracted from title: {}",
            title
        )));
    }
    Ok(parts[..parts.len() - 1].join(TITLE_SEPARATOR))
}

fn unescape_html(input: &str) -> String {
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
