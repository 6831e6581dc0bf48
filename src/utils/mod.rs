//! Shared utility functions.
//!
//! This module contains helpers used across multiple modules in the crate,
//! currently the filename derivation and sanitization routines shared by the
//! streaming downloader and the folder flattener.

pub mod filename;

pub use filename::sanitize_filename;
