//! Transport abstraction for probe requests.
//!
//! The engine only needs "send this request, give me status and body".
//! [`HttpTransport`] does it over reqwest; tests substitute their own.

pub mod http;

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::RequestMethod;

pub use http::HttpTransport;

/// Fully resolved request for one site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub method: RequestMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    /// Sent only for POST and PUT
    pub body: Option<String>,
    pub follow_redirects: bool,
}

/// What came back from the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: String,
}

/// Why no response was obtained.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Sends probe requests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ProbeRequest) -> Result<ProbeResponse, TransportError>;
}
