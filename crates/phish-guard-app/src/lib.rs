#![warn(missing_docs)]
//! # phish-guard-app
//!
//! ## Purpose
//! Wires the analysis client, decision function, renderers and status relay
//! into the two `phish-guard` surfaces.
//!
//! ## Responsibilities
//! - Resolve runtime configuration (backend URL, request timeout).
//! - Run the page-context reporter: analyse on initialisation and on
//!   `analyze` messages, mount the banner, report failures to the relay.
//! - Run the popup controller: on-demand scans with a gated scan control.
//! - Deliver queued messages to the [`StatusRelay`].
//!
//! ## Data flow
//! Trigger -> [`AnalysisClient::analyze`] -> [`decide`] -> banner or popup
//! render. Page failures -> [`ExtensionMessage::AnalysisError`] over an
//! `mpsc` channel -> [`deliver_messages`] -> relay icon swap.
//!
//! ## Ownership and lifetimes
//! Each surface exclusively owns its document/view state; surfaces share
//! nothing but cloned clients and message values.
//!
//! ## Error model
//! Analysis failures never escape a surface: they become a degraded UI state
//! plus a log event. [`AppError`] covers configuration and lifecycle misuse.
//!
//! ## Security and privacy notes
//! Page URLs are logged only as fingerprints.

use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use phish_guard_client::{
    AnalysisClient, AnalysisError, DEFAULT_BACKEND_URL, DEFAULT_TIMEOUT, analyze_endpoint,
    url_fingerprint,
};
use phish_guard_relay::{ExtensionMessage, RelayOutcome, StatusRelay};
use phish_guard_render::{PageDocument, render_banner, render_popup, render_popup_text};
use phish_guard_ui::{PopupView, PresentationState, Severity, decide};
use thiserror::Error;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("PHISH_GUARD_VERSION");

/// Environment variable overriding the backend base URL.
pub const ENDPOINT_ENV: &str = "PHISH_GUARD_ENDPOINT";
/// Environment variable overriding the request timeout in milliseconds.
pub const TIMEOUT_ENV: &str = "PHISH_GUARD_TIMEOUT_MS";

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Backend base URL; `/analyze` is appended.
    pub backend_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl AppConfig {
    /// Applies defaults to optional overrides and validates the result.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidEndpoint`] for unusable backend URLs and
    /// [`ConfigError::ZeroTimeout`] for a zero timeout.
    pub fn new(backend_url: Option<String>, timeout_ms: Option<u64>) -> Result<Self, ConfigError> {
        let backend_url = backend_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        analyze_endpoint(&backend_url).map_err(ConfigError::InvalidEndpoint)?;

        let timeout = match timeout_ms {
            Some(0) => return Err(ConfigError::ZeroTimeout),
            Some(ms) => Duration::from_millis(ms),
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            backend_url,
            timeout,
        })
    }

    /// Builds an HTTP analysis client for this configuration.
    ///
    /// # Errors
    /// Returns [`AppError::Client`] when the HTTP client cannot be built.
    pub fn build_client(&self) -> Result<AnalysisClient, AppError> {
        AnalysisClient::http(&self.backend_url, self.timeout).map_err(AppError::Client)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// What one page analysis did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Result was phishing; a banner is mounted.
    BannerShown,
    /// Result did not warrant a banner.
    NoBanner(Severity),
    /// Analysis failed; the relay was notified.
    Failed(String),
}

/// Page-context reporter bound to one loaded page.
pub struct PageReporter {
    client: AnalysisClient,
    page_url: String,
    document: PageDocument,
    outbox: Sender<ExtensionMessage>,
    initialized: bool,
}

impl PageReporter {
    /// Creates a reporter; nothing runs until [`PageReporter::initialize`].
    pub fn new(
        client: AnalysisClient,
        page_url: impl Into<String>,
        document: PageDocument,
        outbox: Sender<ExtensionMessage>,
    ) -> Self {
        Self {
            client,
            page_url: page_url.into(),
            document,
            outbox,
            initialized: false,
        }
    }

    /// Runs the on-load analysis. Valid once per reporter.
    ///
    /// # Errors
    /// Returns [`AppError::AlreadyInitialized`] on a second call.
    pub fn initialize(&mut self) -> Result<PageOutcome, AppError> {
        if self.initialized {
            return Err(AppError::AlreadyInitialized);
        }
        self.initialized = true;
        tracing::info!(
            url_fingerprint = %url_fingerprint(&self.page_url),
            "page reporter loaded; starting analysis"
        );
        Ok(self.analyze())
    }

    /// Handles an inter-context message. Only `analyze` is addressed to the
    /// page context.
    pub fn on_message(&mut self, message: &ExtensionMessage) -> Option<PageOutcome> {
        match message {
            ExtensionMessage::Analyze => Some(self.analyze()),
            ExtensionMessage::AnalysisError { .. } => None,
        }
    }

    /// Page model, including any mounted banner.
    pub fn document(&self) -> &PageDocument {
        &self.document
    }

    /// Mutable page model, for host-driven edits such as dismissal.
    pub fn document_mut(&mut self) -> &mut PageDocument {
        &mut self.document
    }

    fn analyze(&mut self) -> PageOutcome {
        match self.client.analyze(&self.page_url) {
            Ok(result) => {
                let state = decide(&result);
                log_presentation(&self.page_url, &state);
                match render_banner(&state) {
                    Some(banner) => {
                        self.document.mount_banner(banner);
                        PageOutcome::BannerShown
                    }
                    None => PageOutcome::NoBanner(state.severity),
                }
            }
            Err(error) => {
                let message = error.to_string();
                tracing::error!(
                    url_fingerprint = %url_fingerprint(&self.page_url),
                    error = %message,
                    "page analysis failed"
                );
                if self
                    .outbox
                    .send(ExtensionMessage::analysis_error(message.clone()))
                    .is_err()
                {
                    tracing::warn!("status relay is gone; failure not reported");
                }
                PageOutcome::Failed(message)
            }
        }
    }
}

/// What one popup scan did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Scan finished with a result.
    Completed(Severity),
    /// Scan failed; the popup shows the error state.
    Failed(String),
    /// A scan was already in flight; nothing was sent.
    Busy,
}

/// Popup controller for user-initiated scans.
pub struct PopupController {
    client: AnalysisClient,
    view: PopupView,
}

impl PopupController {
    /// Creates a controller with an idle popup.
    pub fn new(client: AnalysisClient) -> Self {
        Self {
            client,
            view: PopupView::new(),
        }
    }

    /// Scans the active tab URL and updates the view.
    ///
    /// The scan control is re-enabled on both success and failure.
    pub fn scan(&mut self, active_tab_url: &str) -> ScanOutcome {
        if !self.view.begin_scan() {
            tracing::debug!("scan requested while another is in flight");
            return ScanOutcome::Busy;
        }

        match self.client.analyze(active_tab_url) {
            Ok(result) => {
                let state = decide(&result);
                log_presentation(active_tab_url, &state);
                self.view.show_result(&state);
                ScanOutcome::Completed(state.severity)
            }
            Err(error) => {
                tracing::error!(
                    url_fingerprint = %url_fingerprint(active_tab_url),
                    error = %error,
                    "popup analysis failed"
                );
                self.view.show_error();
                ScanOutcome::Failed(error.to_string())
            }
        }
    }

    /// Current popup view.
    pub fn view(&self) -> &PopupView {
        &self.view
    }

    /// Popup HTML fragment.
    pub fn render_html(&self) -> String {
        render_popup(&self.view)
    }

    /// Popup summary for terminals.
    pub fn render_text(&self) -> String {
        render_popup_text(&self.view)
    }
}

/// Feeds every queued message to the relay and returns the outcomes.
pub fn deliver_messages(
    relay: &mut StatusRelay,
    inbox: &Receiver<ExtensionMessage>,
) -> Vec<RelayOutcome> {
    inbox.try_iter().map(|message| relay.handle(&message)).collect()
}

fn log_presentation(page_url: &str, state: &PresentationState) {
    let fingerprint = url_fingerprint(page_url);
    if state.confidence.was_clamped() {
        tracing::warn!(
            url_fingerprint = %fingerprint,
            clamped_to = state.confidence.value(),
            "backend confidence outside [0, 1]"
        );
    }
    tracing::info!(
        url_fingerprint = %fingerprint,
        severity = %state.severity,
        confidence = %state.confidence,
        details = state.detail_lines.len(),
        "analysis presented"
    );
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Backend URL rejected by endpoint policy.
    #[error("{0}")]
    InvalidEndpoint(AnalysisError),
    /// Timeout of zero would fail every request.
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be resolved.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Analysis client could not be constructed.
    #[error("client error: {0}")]
    Client(AnalysisError),
    /// Page reporter initialisation was requested twice.
    #[error("page reporter already initialized")]
    AlreadyInitialized,
}
