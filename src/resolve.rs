//! Share-link resolution.
//!
//! This module classifies a URL as belonging to the provider and extracts the
//! resource identifier from it. Identifiers show up in two shapes: an explicit
//! `id` query parameter on direct-download endpoints, and a path segment on the
//! file/document/presentation/spreadsheet view and edit forms. The explicit
//! parameter always wins; otherwise the path is matched against a fixed,
//! ordered list of templates and the first match is taken.
//!
//! # Examples
//!
//! ```rust
//! use drivedl::resolve::parse_url;
//!
//! # fn example() -> drivedl::Result<()> {
//! let parsed = parse_url("https://drive.google.com/file/d/ABC123/view", false)?;
//! assert_eq!(parsed.file_id.as_deref(), Some("ABC123"));
//! assert!(!parsed.is_download_link);
//! # Ok(())
//! # }
//! ```

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use tracing::warn;

use crate::error::{Error, Result};

/// Hostnames recognized as the provider's.
const DRIVE_HOSTS: [&str; 2] = ["drive.google.com", "docs.google.com"];

/// Path templates carrying a file identifier, matched in order. The capture
/// is non-greedy so the identifier stops at the next path separator.
static ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^/file/d/(.*?)/(edit|view)$",
        r"^/file/u/[0-9]+/d/(.*?)/(edit|view)$",
        r"^/document/d/(.*?)/(edit|htmlview|view)$",
        r"^/document/u/[0-9]+/d/(.*?)/(edit|htmlview|view)$",
        r"^/presentation/d/(.*?)/(edit|htmlview|view)$",
        r"^/presentation/u/[0-9]+/d/(.*?)/(edit|htmlview|view)$",
        r"^/spreadsheets/d/(.*?)/(edit|htmlview|view)$",
        r"^/spreadsheets/u/[0-9]+/d/(.*?)/(edit|htmlview|view)$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("hard-coded identifier pattern"))
    .collect()
});

/// Outcome of resolving a share link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    /// The extracted resource identifier, `None` when the URL does not belong
    /// to the provider or carries no recognizable identifier.
    pub file_id: Option<String>,
    /// Whether the URL already points at the direct-download endpoint.
    pub is_download_link: bool,
}

/// Returns true when the URL's host is one of the provider's hostnames.
pub fn is_drive_url(url: &Url) -> bool {
    matches!(url.host_str(), Some(host) if DRIVE_HOSTS.contains(&host))
}

/// The direct-download endpoint for a file identifier.
pub fn direct_download_url(id: &str) -> String {
    format!("https://drive.google.com/uc?id={}", id)
}

/// Extracts the resource identifier (if any) from a share link.
///
/// A URL on a foreign host yields an empty identifier, not an error. With
/// `warn` enabled, a provider view/edit link that is not the direct-download
/// endpoint logs a non-fatal advisory recommending fuzzy resolution.
pub fn parse_url(url: &str, warn: bool) -> Result<ParsedUrl> {
    let parsed =
        Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))?;
    Ok(parse_parts(&parsed, warn))
}

pub(crate) fn parse_parts(url: &Url, advise: bool) -> ParsedUrl {
    let is_download_link = url.path().ends_with("/uc");
    if !is_drive_url(url) {
        return ParsedUrl {
            file_id: None,
            is_download_link: false,
        };
    }

    let file_id = url
        .query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
        .or_else(|| {
            ID_PATTERNS.iter().find_map(|pattern| {
                pattern
                    .captures(url.path())
                    .map(|caps| caps[1].to_string())
            })
        });

    if advise && file_id.is_some() && !is_download_link {
        warn!(
            "you specified a Google Drive link that is not a direct download link; \
             consider enabling fuzzy resolution to rewrite it"
        );
    }

    ParsedUrl {
        file_id,
        is_download_link,
    }
}
