//! Content-addressed download cache.
//!
//! The cache wraps the streaming downloader with idempotent, hash-verified
//! storage under a fixed root. Keys are derived from the source URL by a
//! reversible character substitution rather than a digest, so the on-disk
//! layout stays recognizable and compatible; the trade-off is that two URLs
//! differing only in substituted characters could collide. A file's existence
//! (plus an optional hash match) is the only validity signal: there is no TTL
//! and no metadata sidecar.
//!
//! Downloads land in a private temporary subdirectory first and are renamed
//! into their final path, so a partially written file is never visible under
//! a final cache key. The temporary directory is removed on every exit path.
//!
//! # Examples
//!
//! ```rust,no_run
//! use drivedl::cache::Cache;
//! use drivedl::transfer::TransferConfig;
//!
//! # async fn example() -> drivedl::Result<()> {
//! let cache = Cache::new()?;
//! let config = TransferConfig::default();
//! let path = cache
//!     .download(
//!         "https://drive.google.com/uc?id=0B9P1L--7Wd2vNm9zMTJWOGxobkU",
//!         None,
//!         Some("md5:fa7d7e649ee7f8d7e4a7aa15b1a30bdb"),
//!         None,
//!         &config,
//!     )
//!     .await?;
//! println!("cached at {}", path.display());
//! # Ok(())
//! # }
//! ```

pub mod hash;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tokio::fs;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::transfer::{self, TransferConfig};
use self::hash::HashSpec;

/// Callback invoked on the final path after a successful cached download,
/// e.g. archive extraction.
pub type PostProcess = dyn Fn(&Path) -> Result<()> + Send + Sync;

/// A download cache rooted at a fixed directory.
///
/// Constructed explicitly and passed by reference; there is no process-wide
/// cache singleton.
#[derive(Debug, Clone)]
pub struct Cache {
    root: PathBuf,
}

impl Cache {
    /// Creates a cache rooted at the per-user cache directory.
    pub fn new() -> Result<Self> {
        let root = dirs::cache_dir()
            .ok_or_else(|| Error::Internal("no cache directory for this user".to_string()))?
            .join("drivedl");
        Ok(Self { root })
    }

    /// Creates a cache rooted at an explicit directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory cached files live under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Derives the cache key for a URL.
    ///
    /// The substitution is reversible on purpose; see the module docs for the
    /// collision trade-off.
    pub fn key_for(url: &str) -> String {
        url.replace('/', "-SLASH-")
            .replace(':', "-COLON-")
            .replace('=', "-EQUAL-")
            .replace('?', "-QUESTION-")
    }

    /// Downloads `url` into the cache, or returns the already-cached path.
    ///
    /// With no expected hash an existing file is trusted as-is. With one, a
    /// matching file is returned immediately and a mismatching file is
    /// fetched again exactly once; a mismatch that persists after the
    /// redownload fails with [`Error::HashMismatch`]. `postprocess` runs on
    /// the final path and its failure fails the operation.
    pub async fn download(
        &self,
        url: &str,
        output: Option<&Path>,
        expected_hash: Option<&str>,
        postprocess: Option<&PostProcess>,
        config: &TransferConfig,
    ) -> Result<PathBuf> {
        // A malformed hash spec is a configuration error: fail before any
        // filesystem or network work.
        let spec = expected_hash.map(HashSpec::from_str).transpose()?;

        fs::create_dir_all(&self.root).await?;
        let dest = match output {
            Some(path) => path.to_path_buf(),
            None => self.root.join(Self::key_for(url)),
        };

        if dest.is_file() {
            match &spec {
                None => {
                    debug!("File exists: {}", dest.display());
                    return Ok(dest);
                }
                Some(spec) => {
                    if matches!(hash::check_file_hash(&dest, spec), Ok(true)) {
                        return Ok(dest);
                    }
                    warn!("Hash mismatch, redownloading: {}", dest.display());
                }
            }
        }

        // Removed on drop, whether or not anything below succeeds.
        let staging = tempfile::Builder::new()
            .prefix("dl")
            .tempdir_in(&self.root)?;
        let temp_path = staging.path().join("dl");
        let downloaded = transfer::download(url, Some(temp_path.as_path()), config).await?;
        fs::rename(&downloaded, &dest).await?;

        if let Some(spec) = &spec {
            hash::verify_file_hash(&dest, spec)?;
        }
        if let Some(postprocess) = postprocess {
            postprocess(&dest)?;
        }
        Ok(dest)
    }
}
