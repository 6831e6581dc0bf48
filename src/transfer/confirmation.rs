//! Confirmation-page resolution.
//!
//! A first GET against a file's direct-download endpoint can answer with an
//! HTML interstitial instead of bytes when the file is too large for the
//! provider's virus scan or a rate threshold was hit. The page embeds an
//! anchor pointing at the real signed-download URL; this module digs it out so
//! the caller can re-issue the request.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

use crate::error::{Error, Result};

/// Anchor whose href starts the export-download path.
static CONFIRM_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href="(/uc\?export=download[^"]+)""#).expect("hard-coded pattern")
});

/// Extracts the real download URL from a confirmation page body.
///
/// The href is entity-unescaped (`&amp;` back to `&`) and joined against the
/// URL that produced the interstitial. A page without the anchor fails with
/// [`Error::FileUrlRetrieval`].
pub(crate) fn confirmation_url(base: &Url, body: &str) -> Result<Url> {
    let caps = CONFIRM_ANCHOR
        .captures(body)
        .ok_or(Error::FileUrlRetrieval)?;
    let href = caps[1].replace("&amp;", "&");
    base.join(&href)
        .map_err(|e| Error::InvalidUrl(format!("{}: {}", href, e)))
}
