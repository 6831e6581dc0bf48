//! HTTP client setup shared by every network-facing component.
//!
//! The rest of the crate never constructs raw sockets or bare reqwest
//! clients; everything goes through [`create_http_client`], which turns a
//! [`TransferConfig`](crate::transfer::TransferConfig) into a middleware-wrapped
//! client honoring the configured proxy, TLS-verification, cookie, and
//! user-agent settings.

pub mod client;

pub use client::create_http_client;
