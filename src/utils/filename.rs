//! Filename derivation and sanitization.
//!
//! A destination filename can come from three places, in order of preference:
//! an explicit caller-supplied path, the response's `Content-Disposition`
//! header (when the destination is a directory), and the basename of the URL
//! path. Whatever the source, path-separator characters are replaced before
//! the name touches the filesystem.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::header::{HeaderMap, CONTENT_DISPOSITION};
use reqwest::Url;

/// Name used when neither the URL nor the response yields one.
pub(crate) const FALLBACK_FILENAME: &str = "downloaded_file";

/// RFC 5987 extended form, e.g. `filename*=UTF-8''na%20me.bin`.
static FILENAME_EXTENDED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"filename\*=UTF-8''(.+)").expect("hard-coded pattern"));

/// Basic quoted form, e.g. `attachment; filename="name.bin"`.
static FILENAME_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"attachment; filename="(.*?)""#).expect("hard-coded pattern"));

/// Replaces path-separator characters with underscores so a display name can
/// never escape its directory.
pub fn sanitize_filename(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

pub(crate) fn percent_decode(input: &str) -> String {
    form_urlencoded::parse(input.as_bytes())
        .map(|(key, value)| [key, value].concat())
        .collect()
}

/// Derives a filename from the `Content-Disposition` header, preferring the
/// RFC 5987 extended form over the quoted basic form.
pub(crate) fn filename_from_response(headers: &HeaderMap) -> String {
    if let Some(disposition) = headers
        .get(CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
    {
        if let Some(caps) = FILENAME_EXTENDED.captures(disposition) {
            return sanitize_filename(&percent_decode(&caps[1]));
        }
        if let Some(caps) = FILENAME_QUOTED.captures(disposition) {
            return sanitize_filename(&caps[1]);
        }
    }
    FALLBACK_FILENAME.to_string()
}

/// Derives a filename from the last non-empty segment of the URL path.
pub(crate) fn filename_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
        .map(|name| sanitize_filename(&percent_decode(name)))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}
