#![warn(missing_docs)]
//! # phish-guard-benchmarks
//!
//! Deterministic inputs for latency smoke tests of the decide/render path.

use phish_guard_analysis_contract::{
    AnalysisResult, ExternalChecks, PhishTankCheck, SafeBrowsingCheck,
};

/// Builds a result exercising every detail-line branch.
///
/// `seed` varies confidence across all three severity bands.
pub fn fixture_result(seed: u32) -> AnalysisResult {
    AnalysisResult {
        confidence: f64::from(seed % 120) / 100.0 - 0.1,
        is_phishing: seed % 7 == 0,
        risk_factors: (0..(seed % 5))
            .map(|index| format!("risk factor <{index}> & more"))
            .collect(),
        external_checks: Some(ExternalChecks {
            phishtank: Some(PhishTankCheck {
                is_phishing: seed % 3 == 0,
                error: None,
            }),
            google_safe_browsing: Some(SafeBrowsingCheck {
                is_dangerous: seed % 4 == 0,
                threat_types: vec!["SOCIAL_ENGINEERING".to_string(), "MALWARE".to_string()],
                error: None,
            }),
        }),
    }
}
