//! Shared HTTP client for the backend platform.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Handle to the platform's HTTP surfaces, carrying the base URL and the
/// service key every request authenticates with.
#[derive(Clone)]
pub struct PlatformClient {
    http: Client,
    base_url: Url,
    service_key: String,
}

impl PlatformClient {
    /// Build a client with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, service_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::with_timeout(base_url, service_key, DEFAULT_TIMEOUT)
    }

    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(
        base_url: Url,
        service_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            service_key: service_key.into(),
        })
    }

    /// Resolve an endpoint path against the platform base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, String> {
        self.base_url
            .join(path)
            .map_err(|error| format!("invalid platform endpoint {path}: {error}"))
    }

    /// Start a request with the platform auth headers attached.
    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", self.service_key.as_str())
            .bearer_auth(self.service_key.as_str())
    }
}

/// Compact single-line preview of a response body for error messages.
pub(crate) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

/// Describe a non-success response for the port error message.
pub(crate) fn status_message(status: reqwest::StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    }
}
