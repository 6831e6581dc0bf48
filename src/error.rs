//! Error handling for the drivedl library.
//!
//! This module provides centralized error handling for every failure a
//! download, cache, or folder operation can hit. All errors implement the
//! standard Error trait and carry the underlying source where one exists.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can happen when using drivedl.
///
/// The variants fall into five groups: configuration errors (invalid URL,
/// proxy, or hash specification), transport errors, page/manifest parse
/// errors, integrity errors, and policy errors (incomplete folder listings).
#[derive(Error, Debug)]
pub enum Error {
    /// Error from an underlying system.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Error from the underlying URL parser or the expected URL format.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The configured proxy endpoint could not be parsed.
    #[error("Invalid proxy URL: {0}")]
    InvalidProxy(String),

    /// A hash specification was not of the form `<algorithm>:<hex-digest>`.
    #[error("Invalid hash specification: {0}")]
    InvalidHashSpec(String),

    /// A hash specification named an algorithm this crate does not compute.
    ///
    /// Distinct from [`Error::HashMismatch`]: the file was never checked.
    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedHashAlgorithm(String),

    /// The downloaded file does not match the expected digest.
    #[error("Hash mismatch for {}: expected {expected}, got {actual}", path.display())]
    HashMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// The server answered with an error status (>= 400).
    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),

    /// The real download URL could not be extracted from a confirmation page.
    #[error("failed to retrieve file URL")]
    FileUrlRetrieval,

    /// A folder page could not be decoded into a listing.
    ///
    /// Covers a missing manifest marker, an unexpected page title, and
    /// manifest rows that do not have the expected shape.
    #[error("Folder parse error: {0}")]
    FolderParse(String),

    /// A folder holds the provider page-size maximum of direct children, so
    /// the listing is known to be truncated by pagination.
    #[error("folder contains {0} entries, the maximum the provider returns per page; the listing may be incomplete")]
    FolderIncomplete(usize),

    /// The archive extension is not one of the supported formats.
    #[error("Unsupported archive format: {0}")]
    UnsupportedArchive(String),

    /// I/O Error.
    #[error("I/O error")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Error from the HTTP middleware stack.
    #[error("HTTP middleware error")]
    Middleware {
        #[from]
        source: reqwest_middleware::Error,
    },

    /// Error decoding the embedded folder manifest.
    #[error("JSON decode error")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Error reading a ZIP archive.
    #[error("ZIP archive error")]
    Zip {
        #[from]
        source: zip::result::ZipError,
    },
}

/// Result type alias for operations that can fail with a drivedl error.
pub type Result<T> = std::result::Result<T, Error>;
