//! Resumable streaming download.
//!
//! The fetch loop drives one file from a resolved URL to a destination path:
//! it sets a byte-range header when resuming onto an existing file, follows
//! HTML confirmation interstitials through the
//! [`confirmation`](super::confirmation) resolver, derives the destination
//! filename when the caller did not pin one, and copies the body to disk
//! through the optional throttling layer.
//!
//! # Examples
//!
//! ```rust,no_run
//! use drivedl::transfer::{download, TransferConfig};
//!
//! # async fn example() -> drivedl::Result<()> {
//! let config = TransferConfig::builder().resume(true).build();
//! let path = download(
//!     "https://drive.google.com/uc?id=0B9P1L--7Wd2vNm9zMTJWOGxobkU",
//!     None,
//!     &config,
//! )
//! .await?;
//! println!("saved to {}", path.display());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::header::{HeaderMap, CONTENT_TYPE, RANGE};
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::confirmation::confirmation_url;
use super::throttle::Throttle;
use super::TransferConfig;
use crate::error::{Error, Result};
use crate::http::create_http_client;
use crate::progress;
use crate::resolve;
use crate::utils::filename::{filename_from_response, filename_from_url};

/// Downloads `url` to `output`, building a client from the configuration.
///
/// See [`download_with_client`] for the destination rules; callers issuing
/// many transfers (folder download) share one client instead.
pub async fn download(
    url: &str,
    output: Option<&Path>,
    config: &TransferConfig,
) -> Result<PathBuf> {
    let client = create_http_client(config)?;
    download_with_client(&client, url, output, config).await
}

/// Downloads `url` to `output` using an existing client.
///
/// Destination rules: `None` derives a filename from the URL path basename in
/// the current directory; an existing directory derives one from the
/// response's `Content-Disposition` header; anything else is taken verbatim.
/// With resume enabled and `output` naming an existing file, the transfer
/// restarts from its current size and appends. On failure the partial file is
/// left in place so a later call can resume it.
pub async fn download_with_client(
    client: &ClientWithMiddleware,
    url: &str,
    output: Option<&Path>,
    config: &TransferConfig,
) -> Result<PathBuf> {
    let mut current =
        Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))?;
    if resolve::is_drive_url(&current) {
        current = rewrite_share_link(current, config)?;
    }
    let original = current.clone();

    loop {
        let mut offset = 0u64;
        if config.resume() {
            if let Some(path) = output {
                if path.is_file() {
                    offset = path.metadata()?.len();
                }
            }
        }

        debug!("Fetching {}", current);
        let mut req = client.get(current.as_str());
        if offset > 0 {
            req = req.header(RANGE, format!("bytes={}-", offset));
        }
        let res = req.send().await?;

        // An HTML answer on a binary endpoint is a confirmation interstitial:
        // rewrite the target and try again. If the rewrite leads back to the
        // URL we started from the chain cannot make progress; keep the page
        // itself rather than looping forever.
        if is_html(res.headers()) {
            let body = res.text().await?;
            let next = confirmation_url(&current, &body)?;
            if next == original {
                warn!(
                    "confirmation page for {} points back at itself; saving the page as-is",
                    original
                );
                let dest = resolve_destination(output, &current, None);
                prepare_parent(&dest).await?;
                fs::write(&dest, body.as_bytes()).await?;
                return Ok(dest);
            }
            debug!("Following confirmation page to {}", next);
            current = next;
            continue;
        }

        if res.status().as_u16() >= 400 {
            return Err(Error::Status(res.status()));
        }

        let headers = res.headers().clone();
        let content_length = res.content_length();
        let dest = resolve_destination(output, &current, Some(&headers));
        prepare_parent(&dest).await?;

        let mut open_options = OpenOptions::new();
        open_options.create(true).write(true);
        if config.resume() {
            open_options.append(true);
        } else {
            open_options.truncate(true);
        }
        let mut file = open_options.open(&dest).await?;

        let total = content_length.map(|len| offset + len);
        let pb = progress::transfer_bar(config.quiet(), total, offset);
        pb.set_message(dest.file_name().map_or_else(
            || dest.to_string_lossy().into_owned(),
            |name| name.to_string_lossy().into_owned(),
        ));

        let mut throttle = (config.speed() > 0).then(|| Throttle::new(config.speed()));
        let mut stream = res.bytes_stream();
        while let Some(item) = stream.next().await {
            let chunk = item?;
            file.write_all(&chunk).await?;
            pb.inc(chunk.len() as u64);
            if let Some(throttle) = throttle.as_mut() {
                throttle.pace(chunk.len()).await;
            }
        }
        file.flush().await?;
        pb.finish_and_clear();

        debug!("Downloaded {} to {}", original, dest.display());
        return Ok(dest);
    }
}

/// Rewrites a provider view/edit link to the direct-download endpoint when
/// fuzzy resolution is enabled; otherwise only emits the advisory.
fn rewrite_share_link(url: Url, config: &TransferConfig) -> Result<Url> {
    let parsed = resolve::parse_parts(&url, !config.fuzzy());
    if !config.fuzzy() || parsed.is_download_link {
        return Ok(url);
    }
    let Some(id) = parsed.file_id else {
        return Ok(url);
    };

    let target = match (document_kind(&url), config.format()) {
        (Some(kind), Some(format)) => format!(
            "https://docs.google.com/{}/d/{}/export?format={}",
            kind, id, format
        ),
        _ => format!("https://drive.google.com/uc?id={}", id),
    };
    debug!("Resolved share link {} to {}", url, target);
    Url::parse(&target).map_err(|e| Error::InvalidUrl(format!("{}: {}", target, e)))
}

/// Native document kind named by the first path segment, if any.
fn document_kind(url: &Url) -> Option<&'static str> {
    match url.path_segments()?.next()? {
        "document" => Some("document"),
        "spreadsheets" => Some("spreadsheets"),
        "presentation" => Some("presentation"),
        _ => None,
    }
}

fn is_html(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("text/html"))
}

fn resolve_destination(
    output: Option<&Path>,
    url: &Url,
    headers: Option<&HeaderMap>,
) -> PathBuf {
    match output {
        None => PathBuf::from(filename_from_url(url)),
        Some(path) if path.is_dir() => {
            let name = headers
                .map(filename_from_response)
                .unwrap_or_else(|| filename_from_url(url));
            path.join(name)
        }
        Some(path) => path.to_path_buf(),
    }
}

async fn prepare_parent(dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}
