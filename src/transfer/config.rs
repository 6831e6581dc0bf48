//! Transfer configuration.
//!
//! A [`TransferConfig`] describes how bytes move: proxy endpoint, TLS
//! verification, cookie jar, byte-rate ceiling, resume behavior, fuzzy URL
//! rewriting, export format for native document types, user agent, and quiet
//! mode. It is constructed once per operation through the builder and never
//! mutated afterwards; recursive folder operations share it by reference.

use super::builder::TransferConfigBuilder;

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/109.0";

/// Immutable settings for a download operation.
#[derive(Debug, Clone)]
pub struct TransferConfig {
    pub(crate) proxy: Option<String>,
    pub(crate) verify: bool,
    pub(crate) use_cookies: bool,
    pub(crate) speed: u64,
    pub(crate) resume: bool,
    pub(crate) fuzzy: bool,
    pub(crate) format: Option<String>,
    pub(crate) user_agent: String,
    pub(crate) quiet: bool,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            verify: true,
            use_cookies: true,
            speed: 0,
            resume: false,
            fuzzy: false,
            format: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            quiet: false,
        }
    }
}

impl TransferConfig {
    /// Creates a builder with the default options.
    pub fn builder() -> TransferConfigBuilder {
        TransferConfigBuilder::default()
    }

    /// The proxy endpoint, if any.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Whether TLS certificates are verified.
    pub fn verify(&self) -> bool {
        self.verify
    }

    /// Whether the client keeps an in-memory cookie jar.
    pub fn use_cookies(&self) -> bool {
        self.use_cookies
    }

    /// Byte-rate ceiling in bytes per second; 0 means unlimited.
    pub fn speed(&self) -> u64 {
        self.speed
    }

    /// Whether an existing destination file is resumed rather than replaced.
    pub fn resume(&self) -> bool {
        self.resume
    }

    /// Whether provider view/edit links are rewritten to the direct-download
    /// endpoint before fetching.
    pub fn fuzzy(&self) -> bool {
        self.fuzzy
    }

    /// Export format for native document types, e.g. `pdf` or `xlsx`.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// The user agent sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Whether progress display is suppressed.
    pub fn quiet(&self) -> bool {
        self.quiet
    }
}
