#![warn(missing_docs)]
//! # phish-guard-client
//!
//! ## Purpose
//! Issues analysis requests to the phishing backend and returns parsed
//! results.
//!
//! ## Responsibilities
//! - Validate the backend base URL and derive the `/analyze` endpoint.
//! - Reject blank or non-absolute page URLs before any network call.
//! - Execute requests through an injectable [`AnalysisTransport`].
//! - Classify failures into [`AnalysisError`] variants with readable messages.
//!
//! ## Data flow
//! Surface trigger -> [`AnalysisClient::analyze`] -> [`AnalysisTransport`]
//! (`POST {base}/analyze`) -> status check -> JSON parse ->
//! [`AnalysisResult`].
//!
//! ## Ownership and lifetimes
//! The client owns its endpoint and shares the transport through `Arc`, so
//! both surfaces can hold cheap clones.
//!
//! ## Error model
//! Network, status and parse failures stay distinguishable in
//! [`AnalysisError`], but callers only need its `Display` text; nothing here
//! retries.
//!
//! ## Security and privacy notes
//! Page URLs are logged as [`url_fingerprint`] digests, never verbatim.
//!
//! ## Example
//! ```rust
//! use phish_guard_client::analyze_endpoint;
//!
//! let endpoint = analyze_endpoint("http://localhost:5000").unwrap();
//! assert_eq!(endpoint.as_str(), "http://localhost:5000/analyze");
//! ```

use std::sync::Arc;
use std::time::Duration;

use phish_guard_analysis_contract::{
    ANALYZE_PATH, AnalysisRequest, AnalysisResult, parse_analysis_result, parse_backend_error,
};
use reqwest::header::ACCEPT;
use sha2::{Digest, Sha256};
use thiserror::Error;
use url::{Host, Url};

/// Backend host used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const FINGERPRINT_HEX_LEN: usize = 12;

/// Raw HTTP outcome returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

impl TransportResponse {
    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstract transport used by the analysis client.
pub trait AnalysisTransport: Send + Sync {
    /// Sends one JSON `POST` to the analysis endpoint.
    ///
    /// Implementations return `Ok` for any HTTP response, including non-2xx;
    /// only failures to obtain a response are errors.
    fn post_json(
        &self,
        endpoint: &Url,
        request: &AnalysisRequest,
    ) -> Result<TransportResponse, AnalysisError>;
}

/// `reqwest`-backed transport with a fixed request timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Builds a transport whose requests time out after `timeout`.
    ///
    /// # Errors
    /// Returns [`AnalysisError::Transport`] when the HTTP client cannot be
    /// constructed (for example, TLS backend initialisation failure).
    pub fn new(timeout: Duration) -> Result<Self, AnalysisError> {
        Self::build(reqwest::blocking::Client::builder().timeout(timeout))
    }

    /// Like [`HttpTransport::new`] but ignores system proxy settings, for
    /// backends on the local machine.
    ///
    /// # Errors
    /// Same as [`HttpTransport::new`].
    pub fn without_proxy(timeout: Duration) -> Result<Self, AnalysisError> {
        Self::build(reqwest::blocking::Client::builder().timeout(timeout).no_proxy())
    }

    fn build(builder: reqwest::blocking::ClientBuilder) -> Result<Self, AnalysisError> {
        let client = builder
            .build()
            .map_err(|error| AnalysisError::Transport(error.to_string()))?;
        Ok(Self { client })
    }
}

impl AnalysisTransport for HttpTransport {
    fn post_json(
        &self,
        endpoint: &Url,
        request: &AnalysisRequest,
    ) -> Result<TransportResponse, AnalysisError> {
        let response = self
            .client
            .post(endpoint.clone())
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .map_err(classify_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.text().map_err(classify_reqwest_error)?;
        Ok(TransportResponse { status, body })
    }
}

fn classify_reqwest_error(error: reqwest::Error) -> AnalysisError {
    if error.is_timeout() {
        AnalysisError::Timeout
    } else {
        AnalysisError::Transport(error.to_string())
    }
}

/// Analysis client bound to one backend endpoint.
#[derive(Clone)]
pub struct AnalysisClient {
    endpoint: Url,
    transport: Arc<dyn AnalysisTransport>,
}

impl AnalysisClient {
    /// Creates a client for the backend at `base_url`.
    ///
    /// # Errors
    /// Returns [`AnalysisError::InvalidEndpoint`] when the base URL does not
    /// parse or does not use `http`/`https`.
    pub fn new(
        base_url: &str,
        transport: Arc<dyn AnalysisTransport>,
    ) -> Result<Self, AnalysisError> {
        let endpoint = analyze_endpoint(base_url)?;
        Ok(Self {
            endpoint,
            transport,
        })
    }

    /// Creates a client using [`HttpTransport`].
    ///
    /// Loopback backends (the default `localhost:5000`) bypass system proxies.
    ///
    /// # Errors
    /// Propagates endpoint validation and HTTP client construction errors.
    pub fn http(base_url: &str, timeout: Duration) -> Result<Self, AnalysisError> {
        let endpoint = analyze_endpoint(base_url)?;
        let transport = if is_loopback(&endpoint) {
            HttpTransport::without_proxy(timeout)?
        } else {
            HttpTransport::new(timeout)?
        };
        Ok(Self {
            endpoint,
            transport: Arc::new(transport),
        })
    }

    /// Requests classification of one page URL.
    ///
    /// # Errors
    /// - [`AnalysisError::InvalidUrl`] for blank or non-absolute URLs; no
    ///   request is sent.
    /// - [`AnalysisError::Transport`] / [`AnalysisError::Timeout`] when no
    ///   response arrives.
    /// - [`AnalysisError::Status`] for non-2xx responses.
    /// - [`AnalysisError::Parse`] for bodies that violate the contract.
    pub fn analyze(&self, page_url: &str) -> Result<AnalysisResult, AnalysisError> {
        validate_page_url(page_url)?;

        let fingerprint = url_fingerprint(page_url);
        tracing::debug!(
            endpoint = %self.endpoint,
            url_fingerprint = %fingerprint,
            "sending analysis request"
        );

        let response = self
            .transport
            .post_json(&self.endpoint, &AnalysisRequest::new(page_url))?;

        if !response.is_success() {
            let message = parse_backend_error(&response.body)
                .unwrap_or_else(|| "no error detail".to_string());
            return Err(AnalysisError::Status {
                status: response.status,
                message,
            });
        }

        let result = parse_analysis_result(&response.body)
            .map_err(|error| AnalysisError::Parse(error.to_string()))?;

        for (source, error) in result.external_check_errors() {
            tracing::warn!(
                source,
                error,
                url_fingerprint = %fingerprint,
                "external check unavailable"
            );
        }

        tracing::debug!(
            url_fingerprint = %fingerprint,
            confidence = result.confidence,
            is_phishing = result.is_phishing,
            "analysis response received"
        );
        Ok(result)
    }

    /// Returns the resolved `/analyze` endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Resolves the analysis endpoint for a backend base URL.
///
/// A path prefix on the base is kept: `http://host/api` becomes
/// `http://host/api/analyze`.
///
/// # Errors
/// Returns [`AnalysisError::InvalidEndpoint`] for unparsable URLs or schemes
/// other than `http`/`https`.
pub fn analyze_endpoint(base_url: &str) -> Result<Url, AnalysisError> {
    let mut base = Url::parse(base_url.trim())
        .map_err(|error| AnalysisError::InvalidEndpoint(format!("invalid backend url: {error}")))?;

    if !matches!(base.scheme(), "http" | "https") {
        return Err(AnalysisError::InvalidEndpoint(format!(
            "backend url must use http or https, got {}",
            base.scheme()
        )));
    }

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(ANALYZE_PATH.trim_start_matches('/'))
        .map_err(|error| AnalysisError::InvalidEndpoint(format!("invalid backend url: {error}")))
}

fn is_loopback(endpoint: &Url) -> bool {
    match endpoint.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(address)) => address.is_loopback(),
        Some(Host::Ipv6(address)) => address.is_loopback(),
        None => false,
    }
}

/// Checks that a page URL is non-empty and absolute.
///
/// # Errors
/// Returns [`AnalysisError::InvalidUrl`] otherwise.
pub fn validate_page_url(page_url: &str) -> Result<(), AnalysisError> {
    if page_url.trim().is_empty() {
        return Err(AnalysisError::InvalidUrl("url is empty".to_string()));
    }

    Url::parse(page_url)
        .map(|_| ())
        .map_err(|error| AnalysisError::InvalidUrl(format!("{error}")))
}

/// Short SHA-256 digest of a URL for log correlation.
pub fn url_fingerprint(page_url: &str) -> String {
    let digest = Sha256::digest(page_url.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(FINGERPRINT_HEX_LEN);
    encoded
}

/// Errors produced while requesting an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Backend base URL violates configuration policy.
    #[error("invalid analysis endpoint: {0}")]
    InvalidEndpoint(String),
    /// Page URL is blank or not absolute.
    #[error("invalid page url: {0}")]
    InvalidUrl(String),
    /// No response could be obtained (connection refused, DNS, TLS).
    #[error("failed to reach analysis server: {0}")]
    Transport(String),
    /// Request exceeded the configured timeout.
    #[error("analysis server did not respond in time")]
    Timeout,
    /// Backend answered with a non-success status.
    #[error("HTTP error! status: {status} ({message})")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Backend-provided error text, when available.
        message: String,
    },
    /// Response body was not a valid analysis result.
    #[error("malformed analysis response: {0}")]
    Parse(String),
}
