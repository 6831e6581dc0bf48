//! End-to-end checks of the public API surface.

use std::fs;
use std::io::Write;

use drivedl::archive::extract_all;
use drivedl::transfer::{TransferConfig, DEFAULT_USER_AGENT};
use drivedl::{parse_url, sanitize_filename, Cache, Error};

mod common;
use common::helpers::*;

#[test]
fn test_parse_share_link() {
    let parsed = parse_url("https://drive.google.com/file/d/ABC123/view", false).unwrap();
    assert_eq!(parsed.file_id.as_deref(), Some("ABC123"));
    assert!(!parsed.is_download_link);
}

#[test]
fn test_parse_direct_download_link() {
    let parsed = parse_url("https://drive.google.com/uc?id=ABC123", false).unwrap();
    assert_eq!(parsed.file_id.as_deref(), Some("ABC123"));
    assert!(parsed.is_download_link);
}

#[test]
fn test_default_config() {
    let config = TransferConfig::default();
    assert!(config.verify());
    assert!(config.use_cookies());
    assert_eq!(config.speed(), 0);
    assert!(!config.resume());
    assert!(!config.fuzzy());
    assert_eq!(config.user_agent(), DEFAULT_USER_AGENT);
    assert!(!config.quiet());
}

#[test]
fn test_sanitize_filename() {
    assert_eq!(sanitize_filename("a/b\\c"), "a_b_c");
    assert_eq!(sanitize_filename("plain.txt"), "plain.txt");
}

#[test]
fn test_cache_key_round_trip_shape() {
    let key = Cache::key_for("https://drive.google.com/uc?id=X");
    assert!(!key.contains('/'));
    assert!(!key.contains(':'));
    assert!(!key.contains('?'));
    assert!(!key.contains('='));
}

#[tokio::test]
async fn test_cached_archive_download_with_extraction() {
    // A zip payload served over the loopback listener, cached, verified, and
    // extracted through the postprocess hook.
    let mut zip_bytes = Vec::new();
    {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(&mut zip_bytes));
        writer
            .start_file("inner.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"zipped content").unwrap();
        writer.finish().unwrap();
    }

    let body = zip_bytes.clone();
    let server = TestServer::spawn(move |_req| Response::bytes(body.clone()));

    let root = tempfile::tempdir().unwrap();
    let cache = Cache::with_root(root.path());
    let config = TransferConfig::builder().quiet(true).build();

    let extract_to = root.path().to_path_buf();
    let postprocess = move |path: &std::path::Path| -> drivedl::Result<()> {
        extract_all(path, Some(extract_to.as_path()))?;
        Ok(())
    };

    let archive = root.path().join("bundle.zip");
    cache
        .download(
            &server.url("/bundle.zip"),
            Some(archive.as_path()),
            None,
            Some(&postprocess),
            &config,
        )
        .await
        .unwrap();

    assert_eq!(
        fs::read(root.path().join("inner.txt")).unwrap(),
        b"zipped content"
    );
}

#[test]
fn test_unsupported_archive_error_display() {
    let err = extract_all(std::path::Path::new("bundle.7z"), None).unwrap_err();
    assert!(matches!(err, Error::UnsupportedArchive(_)));
    assert_eq!(err.to_string(), "Unsupported archive format: bundle.7z");
}
