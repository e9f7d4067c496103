#![warn(missing_docs)]
//! # phish-guard-ui
//!
//! ## Purpose
//! Owns the one piece of decision logic in `phish-guard`: mapping an analysis
//! result to a discrete UI state. Both the page banner and the popup consume
//! [`decide`], so their severity rules cannot drift apart.
//!
//! ## Responsibilities
//! - Clamp untrusted confidence scores and format them as percentages.
//! - Classify results into [`Severity`] and semantic [`ColorToken`] values.
//! - Assemble ordered detail lines from external checks and risk factors.
//! - Model the popup view state, including the scan control gate.
//!
//! ## Data flow
//! [`AnalysisResult`] -> [`decide`] -> [`PresentationState`] -> renderers in
//! `phish-guard-render`. Popup flows additionally route the state through
//! [`PopupView`].
//!
//! ## Ownership and lifetimes
//! [`PresentationState`] owns its strings; it is built fresh per response and
//! dropped after rendering.
//!
//! ## Error model
//! [`decide`] is total: malformed numbers are clamped, never rejected. Popup
//! overlap is prevented by guard methods instead of errors.
//!
//! ## Example
//! ```rust
//! use phish_guard_analysis_contract::AnalysisResult;
//! use phish_guard_ui::{decide, Severity};
//!
//! let result = AnalysisResult {
//!     confidence: 0.42,
//!     is_phishing: false,
//!     risk_factors: vec![],
//!     external_checks: None,
//! };
//! let state = decide(&result);
//! assert_eq!(state.severity, Severity::Suspicious);
//! assert_eq!(state.confidence.to_string(), "42.0%");
//! ```

use std::fmt;

use phish_guard_analysis_contract::AnalysisResult;

/// Lower bound (inclusive) of the suspicious confidence band.
pub const SUSPICIOUS_THRESHOLD: f64 = 0.3;
/// Lower bound (inclusive) of the phishing confidence band.
pub const PHISHING_THRESHOLD: f64 = 0.5;

/// Status label for [`Severity::Phishing`].
pub const PHISHING_LABEL: &str = "Warning: Potential Phishing Website Detected.";
/// Status label for [`Severity::Suspicious`].
pub const SUSPICIOUS_LABEL: &str = "Caution: Website May Be Phished.";
/// Status label for [`Severity::Safe`].
pub const SAFE_LABEL: &str = "Website Appears Safe.";

/// Detail line for a PhishTank database match.
pub const PHISHTANK_LINE: &str =
    "This URL is listed in PhishTank's database of known phishing sites.";
/// Detail line for a Google Safe Browsing match.
pub const SAFE_BROWSING_LINE: &str = "Google Safe Browsing has flagged this site as dangerous.";
/// Detail line used when nothing else is reported.
pub const NO_RISK_FACTORS_LINE: &str = "No specific risk factors detected.";

/// Popup status text shown when analysis failed.
pub const ERROR_STATUS: &str = "Error analyzing website";
/// Popup detail line shown when analysis failed.
pub const ERROR_DETAIL: &str =
    "Failed to connect to analysis server. Please ensure the server is running.";

/// Discrete UI classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Nothing suspicious reported.
    Safe,
    /// Graduated caution from a mid-range score.
    Suspicious,
    /// Backend verdict or high-confidence score.
    Phishing,
}

impl Severity {
    /// Stable lowercase name, used in logs and CSS classes.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Safe => "safe",
            Severity::Suspicious => "suspicious",
            Severity::Phishing => "phishing",
        }
    }

    /// Human-readable status label.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Safe => SAFE_LABEL,
            Severity::Suspicious => SUSPICIOUS_LABEL,
            Severity::Phishing => PHISHING_LABEL,
        }
    }

    /// Semantic colour for this severity.
    pub fn color(self) -> ColorToken {
        match self {
            Severity::Safe => ColorToken::Safe,
            Severity::Suspicious => ColorToken::Caution,
            Severity::Phishing => ColorToken::Danger,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic colour identifier; renderers map it to a literal colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorToken {
    /// Safe result.
    Safe,
    /// Suspicious result.
    Caution,
    /// Phishing result.
    Danger,
    /// Analysis failed.
    Error,
}

/// Confidence score clamped to [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Confidence {
    value: f64,
    clamped: bool,
}

impl Confidence {
    /// Clamps a backend-provided score. `NaN` becomes `0.0`.
    pub fn from_untrusted(raw: f64) -> Self {
        if raw.is_nan() {
            return Self {
                value: 0.0,
                clamped: true,
            };
        }

        // `+ 0.0` normalises -0.0 so it never formats with a sign.
        let value = raw.clamp(0.0, 1.0) + 0.0;
        Self {
            value,
            clamped: value != raw,
        }
    }

    /// Clamped score in [0.0, 1.0].
    pub fn value(self) -> f64 {
        self.value
    }

    /// Returns `true` when the raw input was outside [0.0, 1.0] or `NaN`.
    pub fn was_clamped(self) -> bool {
        self.clamped
    }

    /// Clamped score scaled to a percentage, unrounded.
    pub fn percent(self) -> f64 {
        self.value * 100.0
    }
}

impl fmt::Display for Confidence {
    /// One decimal place, rounded from the exact binary value of the
    /// percentage.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.percent())
    }
}

/// UI state derived from one analysis result.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationState {
    /// Discrete classification.
    pub severity: Severity,
    /// Human-readable status label.
    pub label: String,
    /// Semantic colour.
    pub color: ColorToken,
    /// Clamped confidence.
    pub confidence: Confidence,
    /// Ordered lines: external-check findings, then risk factors.
    pub detail_lines: Vec<String>,
}

/// Maps an analysis result to its presentation state.
///
/// The backend verdict wins over the score; otherwise the clamped score picks
/// the band.
pub fn decide(result: &AnalysisResult) -> PresentationState {
    let confidence = Confidence::from_untrusted(result.confidence);
    let severity = classify(result.is_phishing, confidence);

    PresentationState {
        severity,
        label: severity.label().to_string(),
        color: severity.color(),
        confidence,
        detail_lines: detail_lines(result),
    }
}

/// Applies the severity rules to a verdict and clamped score.
pub fn classify(is_phishing: bool, confidence: Confidence) -> Severity {
    let score = confidence.value();
    if is_phishing || score >= PHISHING_THRESHOLD {
        Severity::Phishing
    } else if score >= SUSPICIOUS_THRESHOLD {
        Severity::Suspicious
    } else {
        Severity::Safe
    }
}

/// Builds the ordered detail lines for a result.
pub fn detail_lines(result: &AnalysisResult) -> Vec<String> {
    let mut lines = Vec::new();

    if result.phishtank_flagged() {
        lines.push(PHISHTANK_LINE.to_string());
    }

    if let Some(flag) = result.safe_browsing_flag() {
        lines.push(SAFE_BROWSING_LINE.to_string());
        if !flag.threat_types.is_empty() {
            lines.push(format!("Threat types: {}", flag.threat_types.join(", ")));
        }
    }

    lines.extend(result.risk_factors.iter().cloned());

    if lines.is_empty() {
        lines.push(NO_RISK_FACTORS_LINE.to_string());
    }

    lines
}

/// Popup scan lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    /// No scan has run yet.
    Idle,
    /// A request is in flight; the scan control is disabled.
    Loading,
    /// Last scan produced a result.
    Result,
    /// Last scan failed.
    Error,
}

/// Popup view model.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupView {
    /// Current lifecycle phase.
    pub phase: ScanPhase,
    /// Status label text.
    pub status: String,
    /// Result box colour; `None` until the first scan finishes.
    pub color: Option<ColorToken>,
    /// Confidence line, blank in the error state.
    pub confidence_text: Option<String>,
    /// Detail list entries.
    pub detail_lines: Vec<String>,
}

impl PopupView {
    /// Creates an idle popup with an enabled scan control.
    pub fn new() -> Self {
        Self {
            phase: ScanPhase::Idle,
            status: String::new(),
            color: None,
            confidence_text: None,
            detail_lines: Vec::new(),
        }
    }

    /// Returns `true` when the scan control accepts clicks.
    pub fn scan_enabled(&self) -> bool {
        self.phase != ScanPhase::Loading
    }

    /// Returns `true` while a request is in flight.
    pub fn is_loading(&self) -> bool {
        self.phase == ScanPhase::Loading
    }

    /// Enters the loading phase.
    ///
    /// Returns `false` without changing state when a scan is already running.
    pub fn begin_scan(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        self.phase = ScanPhase::Loading;
        true
    }

    /// Shows a successful result and re-enables the scan control.
    pub fn show_result(&mut self, state: &PresentationState) {
        self.phase = ScanPhase::Result;
        self.status = state.label.clone();
        self.color = Some(state.color);
        self.confidence_text = Some(format!("Confidence Score: {}", state.confidence));
        self.detail_lines = state.detail_lines.clone();
    }

    /// Shows the fixed error state and re-enables the scan control.
    pub fn show_error(&mut self) {
        self.phase = ScanPhase::Error;
        self.status = ERROR_STATUS.to_string();
        self.color = Some(ColorToken::Error);
        self.confidence_text = None;
        self.detail_lines = vec![ERROR_DETAIL.to_string()];
    }
}

impl Default for PopupView {
    fn default() -> Self {
        Self::new()
    }
}
