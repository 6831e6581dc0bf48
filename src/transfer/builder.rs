//! Builder for [`TransferConfig`].
//!
//! # Examples
//!
//! ```rust
//! use drivedl::transfer::TransferConfig;
//!
//! let config = TransferConfig::builder()
//!     .resume(true)
//!     .speed(512 * 1024)
//!     .quiet(true)
//!     .build();
//! assert!(config.resume());
//! ```

use super::config::TransferConfig;

/// A builder used to create a [`TransferConfig`].
#[derive(Default)]
pub struct TransferConfigBuilder {
    config: TransferConfig,
}

impl TransferConfigBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        TransferConfigBuilder::default()
    }

    /// Sets the proxy endpoint, e.g. `http://proxy.example.com:8080`.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.config.proxy = Some(proxy.into());
        self
    }

    /// Enables or disables TLS certificate verification.
    pub fn verify(mut self, verify: bool) -> Self {
        self.config.verify = verify;
        self
    }

    /// Enables or disables the in-memory cookie jar.
    pub fn use_cookies(mut self, use_cookies: bool) -> Self {
        self.config.use_cookies = use_cookies;
        self
    }

    /// Caps the average transfer rate, in bytes per second. 0 removes the cap.
    pub fn speed(mut self, speed: u64) -> Self {
        self.config.speed = speed;
        self
    }

    /// Resumes an existing destination file instead of replacing it.
    pub fn resume(mut self, resume: bool) -> Self {
        self.config.resume = resume;
        self
    }

    /// Rewrites provider view/edit links to the direct-download endpoint.
    pub fn fuzzy(mut self, fuzzy: bool) -> Self {
        self.config.fuzzy = fuzzy;
        self
    }

    /// Sets the export format used for native document types.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.config.format = Some(format.into());
        self
    }

    /// Overrides the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Suppresses progress display.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.config.quiet = quiet;
        self
    }

    /// Creates the [`TransferConfig`] with the specified options.
    pub fn build(self) -> TransferConfig {
        self.config
    }
}
