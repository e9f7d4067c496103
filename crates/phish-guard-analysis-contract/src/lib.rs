#![warn(missing_docs)]
//! # phish-guard-analysis-contract
//!
//! ## Purpose
//! Defines the `/analyze` request and response schema consumed from the
//! phishing analysis backend.
//!
//! ## Responsibilities
//! - Parse response payloads into owned [`AnalysisResult`] values.
//! - Treat absent or `null` optional fields as "not present / not triggered".
//! - Decode the backend error body returned with non-success statuses.
//!
//! ## Data flow
//! Raw JSON response -> [`parse_analysis_result`] -> presentation decision in
//! `phish-guard-ui`.
//!
//! ## Ownership and lifetimes
//! Parsed values are owned structs to avoid borrowing from transient network
//! buffers.
//!
//! ## Error model
//! Invalid JSON or missing mandatory fields return [`AnalysisContractError`].
//! Out-of-range numbers are accepted here; range handling belongs to the
//! presentation layer.
//!
//! ## Security and privacy notes
//! Every string in a response is untrusted backend output and must be escaped
//! before it reaches markup.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Path of the analysis endpoint relative to the configured backend host.
pub const ANALYZE_PATH: &str = "/analyze";

/// Request body sent to the analysis endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Page or active-tab URL to classify.
    pub url: String,
}

impl AnalysisRequest {
    /// Creates a request for one URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Parsed classification returned by the analysis backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Phishing likelihood, nominally in [0.0, 1.0] but not guaranteed.
    pub confidence: f64,
    /// Discrete classifier verdict.
    pub is_phishing: bool,
    /// Human-readable reasons, in backend order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub risk_factors: Vec<String>,
    /// Third-party reputation lookups, when the backend ran them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_checks: Option<ExternalChecks>,
}

impl AnalysisResult {
    /// Returns `true` when the PhishTank lookup matched.
    pub fn phishtank_flagged(&self) -> bool {
        self.external_checks
            .as_ref()
            .and_then(|checks| checks.phishtank.as_ref())
            .is_some_and(|check| check.is_phishing)
    }

    /// Returns the Safe Browsing finding when it flagged the URL.
    pub fn safe_browsing_flag(&self) -> Option<&SafeBrowsingCheck> {
        self.external_checks
            .as_ref()
            .and_then(|checks| checks.google_safe_browsing.as_ref())
            .filter(|check| check.is_dangerous)
    }

    /// Collects error messages reported by external lookups.
    ///
    /// These are informational; a failed lookup is never a triggered flag.
    pub fn external_check_errors(&self) -> Vec<(&'static str, &str)> {
        let Some(checks) = self.external_checks.as_ref() else {
            return Vec::new();
        };

        let mut errors = Vec::new();
        if let Some(error) = checks.phishtank.as_ref().and_then(|c| c.error.as_deref()) {
            errors.push(("phishtank", error));
        }
        if let Some(error) = checks
            .google_safe_browsing
            .as_ref()
            .and_then(|c| c.error.as_deref())
        {
            errors.push(("google_safe_browsing", error));
        }
        errors
    }
}

/// External reputation lookups reported alongside the classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalChecks {
    /// PhishTank database lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phishtank: Option<PhishTankCheck>,
    /// Google Safe Browsing lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_safe_browsing: Option<SafeBrowsingCheck>,
}

/// PhishTank lookup outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhishTankCheck {
    /// URL is listed as a known phishing site.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_phishing: bool,
    /// Lookup failure reported by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Google Safe Browsing lookup outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeBrowsingCheck {
    /// URL matched at least one threat list.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_dangerous: bool,
    /// Matched threat list names (for example `SOCIAL_ENGINEERING`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub threat_types: Vec<String>,
    /// Lookup failure reported by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error body the backend returns with 4xx/5xx statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendErrorBody {
    /// Backend-provided failure description.
    pub error: String,
}

/// Parses raw JSON into an analysis result.
///
/// # Errors
/// Returns [`AnalysisContractError::Decode`] for invalid JSON or missing
/// `confidence` / `is_phishing`.
/// Returns [`AnalysisContractError::InvalidContract`] when `confidence` is not
/// a finite number.
pub fn parse_analysis_result(raw: &str) -> Result<AnalysisResult, AnalysisContractError> {
    let parsed: AnalysisResult = serde_json::from_str(raw)?;

    if !parsed.confidence.is_finite() {
        return Err(AnalysisContractError::InvalidContract(
            "confidence is not a finite number".to_string(),
        ));
    }

    Ok(parsed)
}

/// Extracts the backend error message from a non-success response body.
///
/// Returns `None` when the body is not the documented error shape or the
/// message is blank.
pub fn parse_backend_error(raw: &str) -> Option<String> {
    serde_json::from_str::<BackendErrorBody>(raw)
        .ok()
        .map(|body| body.error.trim().to_string())
        .filter(|message| !message.is_empty())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Analysis contract errors.
#[derive(Debug, Error)]
pub enum AnalysisContractError {
    /// JSON decode failure.
    #[error("analysis decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// Parsed payload violates contract invariants.
    #[error("analysis contract violation: {0}")]
    InvalidContract(String),
}

#[cfg(test)]
mod tests {
    //! Unit tests for response parsing.

    use super::*;

    #[test]
    fn absent_optional_fields_are_not_triggered() {
        let parsed = parse_analysis_result(r#"{"confidence":0.1,"is_phishing":false}"#)
            .expect("minimal payload should parse");

        assert!(parsed.risk_factors.is_empty());
        assert!(parsed.external_checks.is_none());
        assert!(!parsed.phishtank_flagged());
        assert!(parsed.safe_browsing_flag().is_none());
    }

    #[test]
    fn null_fields_parse_as_empty() {
        let raw = r#"{
            "confidence": 0.4,
            "is_phishing": false,
            "risk_factors": null,
            "external_checks": {
                "phishtank": null,
                "google_safe_browsing": {"is_dangerous": true, "threat_types": null}
            }
        }"#;

        let parsed = parse_analysis_result(raw).expect("null fields should parse");
        assert!(parsed.risk_factors.is_empty());
        assert!(!parsed.phishtank_flagged());
        let flag = parsed.safe_browsing_flag().expect("safe browsing should flag");
        assert!(flag.threat_types.is_empty());
    }

    #[test]
    fn missing_verdict_is_rejected() {
        let error = parse_analysis_result(r#"{"confidence":0.9}"#).unwrap_err();
        assert!(matches!(error, AnalysisContractError::Decode(_)));
    }

    #[test]
    fn lookup_errors_are_collected_but_not_flagged() {
        let raw = r#"{
            "confidence": 0.2,
            "is_phishing": false,
            "external_checks": {
                "phishtank": {"error": "PhishTank API key not configured", "is_phishing": false},
                "google_safe_browsing": {"error": "Invalid API request", "is_dangerous": false}
            }
        }"#;

        let parsed = parse_analysis_result(raw).expect("payload should parse");
        assert!(!parsed.phishtank_flagged());
        assert_eq!(
            parsed.external_check_errors(),
            vec![
                ("phishtank", "PhishTank API key not configured"),
                ("google_safe_browsing", "Invalid API request"),
            ]
        );
    }

    #[test]
    fn backend_error_body_is_extracted() {
        assert_eq!(
            parse_backend_error(r#"{"error":"No URL provided"}"#).as_deref(),
            Some("No URL provided")
        );
        assert_eq!(parse_backend_error("<html>oops</html>"), None);
        assert_eq!(parse_backend_error(r#"{"error":"  "}"#), None);
    }
}
