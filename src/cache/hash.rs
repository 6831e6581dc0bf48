//! Hash verification for cached downloads.
//!
//! Expected hashes are written as `<algorithm>:<hex-digest>`, e.g.
//! `md5:fa7d7e649ee7f8d7e4a7aa15b1a30bdb`. A malformed specification and an
//! unknown algorithm are distinct configuration errors, separate from a
//! digest that simply does not match the file.
//!
//! # Examples
//!
//! ```rust
//! use drivedl::cache::hash::HashSpec;
//!
//! let spec: HashSpec = "md5:fa7d7e649ee7f8d7e4a7aa15b1a30bdb".parse()?;
//! assert_eq!(spec.to_string(), "md5:fa7d7e649ee7f8d7e4a7aa15b1a30bdb");
//! # Ok::<(), drivedl::Error>(())
//! ```

use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;
use std::str::FromStr;

use md5::Md5;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Error, Result};

/// Digest algorithms the cache can verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Md5,
    Sha256,
}

impl HashAlgorithm {
    fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha256 => "sha256",
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "md5" => Ok(HashAlgorithm::Md5),
            "sha256" => Ok(HashAlgorithm::Sha256),
            other => Err(Error::UnsupportedHashAlgorithm(other.to_string())),
        }
    }
}

/// A parsed `<algorithm>:<hex-digest>` expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashSpec {
    pub algorithm: HashAlgorithm,
    pub digest: String,
}

impl FromStr for HashSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (algorithm, digest) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidHashSpec(s.to_string()))?;
        if digest.is_empty() {
            return Err(Error::InvalidHashSpec(s.to_string()));
        }
        Ok(Self {
            algorithm: algorithm.parse()?,
            digest: digest.to_ascii_lowercase(),
        })
    }
}

impl fmt::Display for HashSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm.name(), self.digest)
    }
}

/// Computes the hex digest of a file's contents.
pub fn file_digest(path: &Path, algorithm: HashAlgorithm) -> Result<String> {
    let mut file = File::open(path)?;
    let digest = match algorithm {
        HashAlgorithm::Md5 => {
            let mut hasher = Md5::new();
            io::copy(&mut file, &mut hasher)?;
            hex::encode(hasher.finalize())
        }
        HashAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            io::copy(&mut file, &mut hasher)?;
            hex::encode(hasher.finalize())
        }
    };
    Ok(digest)
}

/// Returns whether the file matches the expectation.
pub fn check_file_hash(path: &Path, spec: &HashSpec) -> Result<bool> {
    let actual = file_digest(path, spec.algorithm)?;
    let matches = actual == spec.digest;
    if matches {
        debug!("Hash matches: {} == {}", actual, spec.digest);
    }
    Ok(matches)
}

/// Fails with [`Error::HashMismatch`] when the file does not match.
pub fn verify_file_hash(path: &Path, spec: &HashSpec) -> Result<()> {
    let actual = file_digest(path, spec.algorithm)?;
    if actual == spec.digest {
        return Ok(());
    }
    Err(Error::HashMismatch {
        path: path.to_path_buf(),
        expected: spec.digest.clone(),
        actual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_temp(dir: &TempDir, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join("content.bin");
        let mut file = File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    #[test]
    fn test_parse_spec() {
        let spec: HashSpec = "md5:ABCDEF0123456789".parse().unwrap();
        assert_eq!(spec.algorithm, HashAlgorithm::Md5);
        // Digest is normalized to lowercase.
        assert_eq!(spec.digest, "abcdef0123456789");
    }

    #[test]
    fn test_parse_spec_without_separator() {
        let err = "fa7d7e649ee7f8d7".parse::<HashSpec>().unwrap_err();
        assert!(matches!(err, Error::InvalidHashSpec(_)));
    }

    #[test]
    fn test_parse_spec_unknown_algorithm() {
        let err = "crc32:1127497".parse::<HashSpec>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedHashAlgorithm(_)));
    }

    #[test]
    fn test_md5_digest_of_known_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, b"hello world");
        let digest = file_digest(&path, HashAlgorithm::Md5).unwrap();
        assert_eq!(digest, "5eb63bbbe01eeed093cb22bb8f5acdc3");
    }

    #[test]
    fn test_sha256_digest_of_known_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, b"hello world");
        let digest = file_digest(&path, HashAlgorithm::Sha256).unwrap();
        assert_eq!(
            digest,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_verify_mismatch_reports_both_digests() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, b"hello world");
        let spec: HashSpec = "md5:00000000000000000000000000000000".parse().unwrap();
        match verify_file_hash(&path, &spec).unwrap_err() {
            Error::HashMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, "00000000000000000000000000000000");
                assert_eq!(actual, "5eb63bbbe01eeed093cb22bb8f5acdc3");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
