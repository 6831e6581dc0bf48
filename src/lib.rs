//! Drivedl resolves Google Drive share links and streams files and whole
//! folder trees to local storage over plain HTTP(S).
//!
//! The provider exposes no listing API to unauthenticated clients: folder
//! contents arrive as JSON embedded in an HTML page, and large files answer
//! their first request with an HTML confirmation page instead of bytes. This
//! crate scrapes both transparently, resumes interrupted transfers from the
//! bytes already on disk, throttles to a configured average rate, and keeps a
//! content-addressed cache of verified downloads.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use drivedl::{download, TransferConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), drivedl::Error> {
//! let config = TransferConfig::builder().resume(true).build();
//! let file = "https://drive.google.com/uc?id=0B9P1L--7Wd2vNm9zMTJWOGxobkU";
//! let path = download(file, None, &config).await?;
//! println!("saved to {}", path.display());
//! # Ok(())
//! # }
//! ```
//!
//! Folders work the same way, addressed by URL or identifier:
//!
//! ```rust,no_run
//! use drivedl::folder::{list_folder, FolderOptions, FolderRef};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), drivedl::Error> {
//! let entries = list_folder(
//!     &FolderRef::Id("1gG8rmSXKXRHjHNMPs2fxCdcbcFnyAsr8"),
//!     &FolderOptions::default(),
//! )
//! .await?;
//! for entry in entries {
//!     println!("{}", entry.path.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`resolve`] - share-link classification and identifier extraction
//! - [`transfer`] - the resumable, throttled streaming downloader and its
//!   configuration
//! - [`cache`] - hash-verified, content-addressed download cache
//! - [`folder`] - recursive folder-tree resolution, listing, and download
//! - [`archive`] - local archive extraction for downloaded bundles
//! - [`http`] - construction of the shared HTTP client
//! - [`error`] - centralized error handling with the [`Error`] enum
//! - [`progress`] - progress bar styling and display

pub mod archive;
pub mod cache;
pub mod error;
pub mod folder;
pub mod http;
pub mod progress;
pub mod resolve;
pub mod transfer;
pub mod utils;

pub use cache::Cache;
pub use error::{Error, Result};
pub use folder::{
    download_folder, flatten, list_folder, resolve_folder, DriveNode, FlattenedEntry,
    FolderOptions, FolderRef,
};
pub use http::create_http_client;
pub use resolve::{is_drive_url, parse_url, ParsedUrl};
pub use transfer::{download, download_with_client, TransferConfig, TransferConfigBuilder};
pub use utils::sanitize_filename;
