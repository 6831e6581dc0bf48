//! HTTP client construction.
//!
//! Builds the one client shared across an operation: proxy endpoint, TLS
//! verification toggle, an in-memory cookie jar (the provider sets a consent
//! cookie between the confirmation page and the real payload), the configured
//! user agent as a default header, and tracing middleware for request and
//! response logging.
//!
//! # Examples
//!
//! ```rust
//! use drivedl::http::create_http_client;
//! use drivedl::transfer::TransferConfig;
//!
//! # fn example() -> drivedl::Result<()> {
//! let config = TransferConfig::default();
//! let client = create_http_client(&config)?;
//! # Ok(())
//! # }
//! ```

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Proxy;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;

use crate::error::{Error, Result};
use crate::transfer::TransferConfig;

/// Creates the HTTP client used for all fetches within one operation.
///
/// A malformed proxy endpoint is a configuration error and fails fast with
/// [`Error::InvalidProxy`]; nothing is retried at this layer.
pub fn create_http_client(config: &TransferConfig) -> Result<ClientWithMiddleware> {
    let mut headers = HeaderMap::new();
    let agent = HeaderValue::from_str(config.user_agent())
        .map_err(|e| Error::Internal(format!("invalid user agent: {}", e)))?;
    headers.insert(USER_AGENT, agent);

    let mut inner_client_builder = reqwest::Client::builder()
        .default_headers(headers)
        .danger_accept_invalid_certs(!config.verify())
        .cookie_store(config.use_cookies());

    if let Some(proxy) = config.proxy() {
        let proxy = Proxy::all(proxy)
            .map_err(|e| Error::InvalidProxy(format!("{}: {}", proxy, e)))?;
        inner_client_builder = inner_client_builder.proxy(proxy);
    }

    let inner_client = inner_client_builder.build()?;

    // Trace HTTP requests. See the tracing crate to make use of these traces.
    let client = ClientBuilder::new(inner_client)
        .with(TracingMiddleware::default())
        .build();

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::TransferConfig;

    #[test]
    fn test_create_http_client_default() {
        let config = TransferConfig::default();
        let client = create_http_client(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_create_http_client_with_proxy() {
        let config = TransferConfig::builder()
            .proxy("http://proxy.example.com:8080")
            .build();
        let client = create_http_client(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_create_http_client_invalid_proxy() {
        let config = TransferConfig::builder().proxy("not a proxy url").build();
        let client = create_http_client(&config);
        assert!(matches!(client, Err(Error::InvalidProxy(_))));
    }
}
