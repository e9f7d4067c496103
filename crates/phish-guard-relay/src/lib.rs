#![warn(missing_docs)]
//! # phish-guard-relay
//!
//! ## Purpose
//! Background status relay: owns the process-wide extension icon state and the
//! inter-context message vocabulary.
//!
//! ## Responsibilities
//! - Define [`ExtensionMessage`] with its `action`-tagged JSON shape.
//! - Model the icon as an explicit [`IconState`] machine.
//! - Resolve the fixed-size icon asset set for each state.
//!
//! ## Data flow
//! Page reporter failure -> `{action: "analysisError"}` ->
//! [`StatusRelay::handle`] -> [`RelayOutcome::IconChanged`] -> host icon swap.
//!
//! ## Error model
//! The relay cannot fail; unknown or irrelevant messages are ignored.
//!
//! ## Example
//! ```rust
//! use phish_guard_relay::{ExtensionMessage, IconState, RelayOutcome, StatusRelay};
//!
//! let mut relay = StatusRelay::new();
//! let message = ExtensionMessage::analysis_error("offline");
//! assert!(matches!(relay.handle(&message), RelayOutcome::IconChanged(_)));
//! assert_eq!(relay.handle(&message), RelayOutcome::Unchanged);
//! assert_eq!(relay.state(), IconState::Error);
//! ```

use serde::{Deserialize, Serialize};

/// Icon sizes shipped with the extension.
pub const ICON_SIZES: [u32; 3] = [16, 48, 128];

/// Message exchanged between extension contexts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum ExtensionMessage {
    /// Ask the page context to re-run analysis.
    #[serde(rename = "analyze")]
    Analyze,
    /// Page analysis failed.
    #[serde(rename = "analysisError")]
    AnalysisError {
        /// Human-readable failure message.
        error: String,
    },
}

impl ExtensionMessage {
    /// Builds an `analysisError` message.
    pub fn analysis_error(error: impl Into<String>) -> Self {
        Self::AnalysisError {
            error: error.into(),
        }
    }
}

/// Visible extension icon state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconState {
    /// Default icon.
    Normal,
    /// Analysis failure glyph.
    Error,
}

/// Fixed-size icon asset paths for one state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSet {
    /// `(size, path)` pairs in ascending size order.
    pub paths: Vec<(u32, String)>,
}

impl IconSet {
    /// Asset set for a state: `icons/icon{N}.png` or `icons/icon{N}_error.png`.
    pub fn for_state(state: IconState) -> Self {
        let suffix = match state {
            IconState::Normal => "",
            IconState::Error => "_error",
        };
        Self {
            paths: ICON_SIZES
                .iter()
                .map(|size| (*size, format!("icons/icon{size}{suffix}.png")))
                .collect(),
        }
    }

    /// Path for one size, if shipped.
    pub fn path(&self, size: u32) -> Option<&str> {
        self.paths
            .iter()
            .find(|(candidate, _)| *candidate == size)
            .map(|(_, path)| path.as_str())
    }
}

/// Result of handling one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Icon must be swapped to this set.
    IconChanged(IconSet),
    /// Message was relevant but the icon already reflects it.
    Unchanged,
    /// Message is not addressed to the relay.
    Ignored,
}

/// Background listener owning the icon state machine.
#[derive(Debug, Clone)]
pub struct StatusRelay {
    state: IconState,
}

impl StatusRelay {
    /// Creates a relay showing the normal icon.
    pub fn new() -> Self {
        Self {
            state: IconState::Normal,
        }
    }

    /// Current icon state.
    pub fn state(&self) -> IconState {
        self.state
    }

    /// Install lifecycle hook; logs only.
    pub fn on_installed(&self) {
        tracing::info!("phishing detector extension installed");
    }

    /// Applies one message. Only `analysisError` mutates state.
    pub fn handle(&mut self, message: &ExtensionMessage) -> RelayOutcome {
        match message {
            ExtensionMessage::AnalysisError { error } => {
                if self.state == IconState::Error {
                    tracing::debug!(error = %error, "icon already in error state");
                    return RelayOutcome::Unchanged;
                }
                self.state = IconState::Error;
                tracing::warn!(error = %error, "page analysis failed; switching icon to error");
                RelayOutcome::IconChanged(IconSet::for_state(IconState::Error))
            }
            ExtensionMessage::Analyze => RelayOutcome::Ignored,
        }
    }
}

impl Default for StatusRelay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the message shape and icon transitions.

    use super::*;

    #[test]
    fn messages_use_action_tag() {
        assert_eq!(
            serde_json::to_value(ExtensionMessage::Analyze).unwrap(),
            serde_json::json!({"action": "analyze"})
        );

        let parsed: ExtensionMessage =
            serde_json::from_str(r#"{"action":"analysisError","error":"HTTP error! status: 502"}"#)
                .unwrap();
        assert_eq!(parsed, ExtensionMessage::analysis_error("HTTP error! status: 502"));

        assert!(serde_json::from_str::<ExtensionMessage>(r#"{"action":"unknown"}"#).is_err());
    }

    #[test]
    fn error_icon_set_covers_all_sizes() {
        let icons = IconSet::for_state(IconState::Error);
        assert_eq!(icons.path(16), Some("icons/icon16_error.png"));
        assert_eq!(icons.path(48), Some("icons/icon48_error.png"));
        assert_eq!(icons.path(128), Some("icons/icon128_error.png"));
        assert_eq!(icons.path(32), None);

        assert_eq!(
            IconSet::for_state(IconState::Normal).path(16),
            Some("icons/icon16.png")
        );
    }

    #[test]
    fn analyze_message_is_ignored() {
        let mut relay = StatusRelay::new();
        assert_eq!(relay.handle(&ExtensionMessage::Analyze), RelayOutcome::Ignored);
        assert_eq!(relay.state(), IconState::Normal);
    }

    #[test]
    fn repeated_failures_change_icon_once() {
        let mut relay = StatusRelay::new();
        let first = relay.handle(&ExtensionMessage::analysis_error("a"));
        assert_eq!(
            first,
            RelayOutcome::IconChanged(IconSet::for_state(IconState::Error))
        );
        for _ in 0..3 {
            assert_eq!(
                relay.handle(&ExtensionMessage::analysis_error("b")),
                RelayOutcome::Unchanged
            );
        }
        assert_eq!(relay.state(), IconState::Error);
    }
}
